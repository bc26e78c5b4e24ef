// replayc command-line interface
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of replayc.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! This is the replay compiler.
//!
//! `replayc` compiles an XML document into Rust source that replays the
//!   document's events against any
//!   [`ContentHandler`](replayc::ContentHandler).

extern crate replayc;

use getopts::{Fail, Options};
use replayc::{compile::CompilerConfig, pipeline};
use std::{
    env,
    error::Error,
    fmt::{self, Display},
    fs::{self, File},
    io::{self, BufReader},
    path::Path,
};

/// Types of commands
#[derive(Debug, PartialEq)]
enum Command {
    Compile {
        input: String,
        output: String,
        config: CompilerConfig,
    },
    Usage,
}

/// Compile a source file,
///   writing to the provided destination path.
///
/// Output is compiled entirely into memory and is written only if
///   compilation succeeds,
///     so that a failure never leaves a partial file behind.
fn compile(
    src_path: &str,
    dest_path: &str,
    config: CompilerConfig,
) -> Result<(), ReplaycError> {
    let input = BufReader::new(File::open(src_path)?);
    let source = pipeline::xml_to_buffer(input, config)?;

    fs::write(dest_path, source)?;

    Ok(())
}

/// Entrypoint for the compiler
pub fn main() {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = get_opts();
    let usage = opts.usage(&format!("Usage: {} [OPTIONS] INPUT", program));

    match parse_options(opts, args) {
        Ok(Command::Compile {
            input,
            output,
            config,
        }) => {
            if let Err(e) = compile(&input, &output, config) {
                eprintln!("error: {e}\nfatal: failed to compile `{input}`");
                std::process::exit(1);
            }
        }
        Ok(Command::Usage) => {
            println!("{}", usage);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", usage);
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("o", "output", "set output file name", "NAME");
    opts.optopt(
        "",
        "runtime",
        "path of the runtime crate in generated code",
        "PATH",
    );
    opts.optopt(
        "",
        "type",
        "type to declare if the document does not declare one",
        "NAME",
    );
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(&args[1..])?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let input = match matches.free.len() {
        0 => return Err(Fail::OptionMissing(String::from("INPUT"))),
        1 => matches.free[0].clone(),
        _ => return Err(Fail::UnrecognizedOption(matches.free[1].clone())),
    };

    let mut config = CompilerConfig::default();

    if let Some(path) = matches.opt_str("runtime") {
        config.runtime_path = path;
    }

    if let Some(name) = matches.opt_str("type") {
        if name.is_empty() {
            return Err(Fail::ArgumentMissing(String::from("--type")));
        }

        config.default_type = name;
    }

    let output = match matches.opt_str("o") {
        Some(m) => m,
        None => Path::new(&input)
            .with_extension("rs")
            .to_string_lossy()
            .into_owned(),
    };

    if output == input {
        return Err(Fail::UnexpectedArgument(format!(
            "output `{output}` would overwrite input"
        )));
    }

    Ok(Command::Compile {
        input,
        output,
        config,
    })
}

/// Compiler (`replayc`) error.
///
/// This represents the aggregation of all possible errors that can occur
///   during compile-time.
#[derive(Debug)]
pub enum ReplaycError {
    Io(io::Error),
    Pipeline(pipeline::Error),
}

impl From<io::Error> for ReplaycError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<pipeline::Error> for ReplaycError {
    fn from(e: pipeline::Error) -> Self {
        Self::Pipeline(e)
    }
}

impl Display for ReplaycError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => Display::fmt(e, f),
            Self::Pipeline(e) => Display::fmt(e, f),
        }
    }
}

impl Error for ReplaycError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Pipeline(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        std::iter::once("program")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parse_options_help() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["-h"]));

        match result {
            Ok(Command::Usage) => {}
            _ => panic!("Help option did not parse"),
        }
    }

    #[test]
    fn parse_options_help_long() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["--help"]));

        match result {
            Ok(Command::Usage) => {}
            _ => panic!("Long help option did not parse"),
        }
    }

    #[test]
    fn parse_options_invalid() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["-q"]));

        match result {
            Err(Fail::UnrecognizedOption(_)) => {}
            _ => panic!("Invalid option not caught"),
        }
    }

    #[test]
    fn parse_options_missing_input() {
        let opts = get_opts();
        let result = parse_options(opts, args(&[]));

        match result {
            Err(Fail::OptionMissing(message)) => {
                assert_eq!("INPUT", message);
            }
            _ => panic!("Missing input not caught"),
        }
    }

    #[test]
    fn parse_options_too_many_args() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["foo.xml", "baz"]));

        match result {
            Err(Fail::UnrecognizedOption(message)) => {
                assert_eq!("baz", message);
            }
            _ => panic!("Extra option not caught"),
        }
    }

    #[test]
    fn parse_options_valid() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["dir/foo.xml"]));

        assert_eq!(
            result,
            Ok(Command::Compile {
                input: "dir/foo.xml".into(),
                output: "dir/foo.rs".into(),
                config: CompilerConfig::default(),
            })
        );
    }

    #[test]
    fn parse_options_valid_custom_out() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["foo.xml", "-o", "gen.rs"]));

        match result {
            Ok(Command::Compile { input, output, .. }) => {
                assert_eq!("foo.xml", input);
                assert_eq!("gen.rs", output);
            }
            _ => panic!("Unexpected result"),
        }
    }

    #[test]
    fn parse_options_valid_custom_out_long() {
        let opts = get_opts();
        let result =
            parse_options(opts, args(&["foo.xml", "--output", "gen.rs"]));

        match result {
            Ok(Command::Compile { output, .. }) => {
                assert_eq!("gen.rs", output);
            }
            _ => panic!("Unexpected result"),
        }
    }

    #[test]
    fn parse_options_runtime_and_type() {
        let opts = get_opts();
        let result = parse_options(
            opts,
            args(&["foo.xml", "--runtime", "crate::rt", "--type", "Foo"]),
        );

        match result {
            Ok(Command::Compile { config, .. }) => {
                assert_eq!(
                    config,
                    CompilerConfig {
                        runtime_path: "crate::rt".into(),
                        default_type: "Foo".into(),
                    }
                );
            }
            _ => panic!("Unexpected result"),
        }
    }

    #[test]
    fn parse_options_empty_type() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["foo.xml", "--type", ""]));

        match result {
            Err(Fail::ArgumentMissing(message)) => {
                assert_eq!("--type", message);
            }
            _ => panic!("Empty type not caught"),
        }
    }

    #[test]
    fn parse_options_output_overwrites_input() {
        let opts = get_opts();
        let result = parse_options(opts, args(&["foo.rs"]));

        match result {
            Err(Fail::UnexpectedArgument(_)) => {}
            _ => panic!("Overwriting input not caught"),
        }
    }
}
