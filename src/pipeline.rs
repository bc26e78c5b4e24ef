// Compilation pipeline
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

//! Lowering of an XML byte stream into replay source.
//!
//! The pipeline connects an [`XmlEventReader`] to a [`Compiler`]:
//!   every event yielded by the reader is fed to the compiler as soon as
//!   it is read,
//!     so output is produced while input is still being parsed.
//! The first error from either stage aborts the pipeline.

use crate::{
    compile::{self, Compiler, CompilerConfig},
    reader::{self, XmlEventReader},
};
use std::{
    fmt::Display,
    io::{BufRead, Write},
};

/// Compile the XML document `input` into replay source written to `out`.
///
/// The output sink is returned on success.
/// On failure,
///   whatever has already been written to `out` is incomplete and should
///   be discarded.
pub fn xml_to_source<B: BufRead, W: Write>(
    input: B,
    out: W,
    config: CompilerConfig,
) -> Result<W, Error> {
    let mut compiler = Compiler::with_config(out, config);

    for ev in XmlEventReader::new(input) {
        ev?.feed(&mut compiler)?;
    }

    Ok(compiler.into_inner())
}

/// Compile the XML document `input` into a new buffer.
pub fn xml_to_buffer<B: BufRead>(
    input: B,
    config: CompilerConfig,
) -> Result<Vec<u8>, Error> {
    xml_to_source(input, Vec::new(), config)
}

/// Error from any stage of the pipeline.
#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Compile(compile::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "error reading XML: {e}"),
            Self::Compile(e) => write!(f, "error compiling: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            Self::Compile(e) => Some(e),
        }
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

impl From<compile::Error> for Error {
    fn from(e: compile::Error) -> Self {
        Self::Compile(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{compile::Directive, reader::SpanlessError};

    fn compile(src: &str) -> Result<String, Error> {
        xml_to_buffer(src.as_bytes(), Default::default())
            .map(|buf| String::from_utf8(buf).unwrap())
    }

    #[test]
    fn compiles_document_with_directives() {
        let out = compile(
            "<?directive:package gen?>\
             <?directive:class Doc?>\
             <root a=\"1\">text</root>",
        )
        .unwrap();

        assert!(out.starts_with(compile::BANNER));
        assert!(out.contains("pub mod gen {\n    pub enum Doc {}\n"));
        assert!(out.contains(r#"attrs.add("", "a", "a", "CDATA", "1");"#));
        assert!(out.contains(r#"const CHARS: &'static str = "text";"#));
        assert!(out.ends_with("    }\n}\n"));
    }

    #[test]
    fn reader_error_aborts() {
        assert!(matches!(
            compile("<root>text"),
            Err(Error::Read(reader::Error {
                kind: SpanlessError::UnclosedElement(_) | SpanlessError::Xml(_),
                ..
            }))
        ));
    }

    #[test]
    fn compiler_error_aborts() {
        assert!(matches!(
            compile("<root><?directive:class Late?></root>"),
            Err(Error::Compile(compile::Error::StructuralOrder {
                directive: Directive::Class,
                ..
            }))
        ));
    }
}
