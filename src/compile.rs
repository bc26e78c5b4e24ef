// Event-to-source compiler
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

//! Compile a document event stream into Rust replay source.
//!
//! The [`Compiler`] is a [`ContentHandler`]:
//!   each event it receives is immediately lowered into zero or more lines
//!   of Rust source that,
//!     when executed,
//!     issue the same call against another [`ContentHandler`].
//! Output is produced in a single forward pass;
//!   nothing that has been written is ever revisited.
//!
//! Generated code has the following shape:
//!
//! ```text
//! pub mod package {                       // directive:package (optional)
//!     pub enum Type {}                    // directive:class
//!
//!     impl Type {
//!         pub fn emit<S: ...>(sink: &mut S, args...) -> ... {
//!             ...                         // replay calls
//!         }
//!
//!         const CHARS: &'static str = "...";
//!     }
//! }
//! ```
//!
//! Directives
//! ==========
//! Processing instructions whose target is a [`Directive`] are
//!   interpreted by the compiler rather than replayed.
//! They are ordered by [`CompilerState`],
//!   which only ever moves forward;
//!     a directive received out of order is an
//!     [`Error::StructuralOrder`].
//!
//! If replay content arrives before the entry point has been declared,
//!   the compiler declares it itself with no extra arguments
//!     (and,
//!       if no type has been declared either,
//!       the type [`CompilerConfig::default_type`]).
//!
//! Character Data
//! ==============
//! All character data of a document is appended to one text buffer,
//!   which is emitted once as the `CHARS` constant of the generated type.
//! Each character event replays a window `&Self::CHARS[start..end]` of
//!   that buffer;
//!     windows are contiguous and,
//!       read in order,
//!       reconstruct the buffer exactly.

mod error;
pub mod trace;


pub use error::Error;

use crate::{
    literal::{DefaultEncoder, LiteralEncoder},
    sink::{Attributes, ContentHandler},
};
use std::{
    fmt::{self, Arguments, Display},
    io::Write,
    result,
};
use trace::{CompilerTrace, DefaultTrace};

pub type Result<T> = result::Result<T, Error>;

/// First line of all generated source.
pub const BANNER: &str =
    "// This code was generated by replayc. Please regenerate instead of editing.";

/// Indentation of a single nesting level of generated source.
const INDENT: &[u8] = b"    ";

/// Return type of the generated entry point and its protective closure.
const RESULT_TY: &str = "::core::result::Result<(), S::Error>";

/// Declaration progress of the generated source.
///
/// States are ordered and transitions only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CompilerState {
    /// Nothing has yet been declared.
    #[default]
    Initial,
    /// A package module has been opened.
    PackageDeclared,
    /// A type has been declared and its `impl` block opened.
    TypeDeclared,
    /// The entry point has been opened and replay calls are being
    ///   emitted.
    BodyOpen,
}

impl Display for CompilerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::PackageDeclared => write!(f, "package declared"),
            Self::TypeDeclared => write!(f, "type declared"),
            Self::BodyOpen => write!(f, "body open"),
        }
    }
}

/// Processing instruction targets interpreted by the [`Compiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Wrap generated source in `pub mod <data>`.
    Package,
    /// Declare the generated type `<data>`.
    Class,
    /// Declare the entry point with the additional parameters `<data>`.
    Args,
    /// Do not replay the root element or the document boundaries.
    OmitRoot,
    /// Emit `<data>` verbatim as a statement of the entry point.
    Code,
}

impl Directive {
    pub fn from_target(target: &str) -> Option<Self> {
        match target {
            "directive:package" => Some(Self::Package),
            "directive:class" => Some(Self::Class),
            "directive:args" => Some(Self::Args),
            "directive:omitRoot" => Some(Self::OmitRoot),
            "directive:code" => Some(Self::Code),
            _ => None,
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            Self::Package => "directive:package",
            Self::Class => "directive:class",
            Self::Args => "directive:args",
            Self::OmitRoot => "directive:omitRoot",
            Self::Code => "directive:code",
        }
    }

    /// Whether this directive may be processed in `state`.
    ///
    /// [`Directive::Code`] is always permitted,
    ///   since it first causes the entry point to be declared.
    pub fn permitted_in(&self, state: CompilerState) -> bool {
        use CompilerState::*;

        match self {
            Self::Package => state == Initial,
            Self::Class => state <= PackageDeclared,
            Self::Args => state == TypeDeclared,
            Self::OmitRoot => state <= TypeDeclared,
            Self::Code => true,
        }
    }

    /// Human-readable description of the states in which this directive
    ///   is permitted.
    pub fn expected_state(&self) -> &'static str {
        match self {
            Self::Package => "`initial`",
            Self::Class => "`initial` or `package declared`",
            Self::Args => "`type declared`",
            Self::OmitRoot => "any state before `body open`",
            Self::Code => "any state",
        }
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target())
    }
}

/// Configuration of generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Path of the crate providing [`ContentHandler`] and [`Attributes`]
    ///   to generated code.
    pub runtime_path: String,

    /// Name of the type to declare if content arrives before any
    ///   [`Directive::Class`].
    pub default_type: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            runtime_path: "::replayc".into(),
            default_type: "Replay".into(),
        }
    }
}

/// Compile document events into Rust source written to `W`.
///
/// A compiler is good for exactly one document.
/// After [`ContentHandler::end_document`] or after any error,
///   every further event fails with [`Error::Closed`].
pub struct Compiler<W: Write, L: LiteralEncoder = DefaultEncoder> {
    out: W,
    enc: L,
    config: CompilerConfig,
    state: CompilerState,

    /// Shared text buffer;
    ///   its length is the offset of the next character window.
    chars: String,

    /// Element nesting level.
    level: usize,

    omit_root: bool,

    /// Whether a package module was opened and must be closed.
    package: bool,

    /// Indentation depth of the next emitted line.
    depth: usize,

    closed: bool,
    trace: DefaultTrace,
}

impl<W: Write> Compiler<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, Default::default())
    }

    pub fn with_config(out: W, config: CompilerConfig) -> Self {
        Self::with_encoder(out, config, Default::default())
    }
}

impl<W: Write, L: LiteralEncoder> Compiler<W, L> {
    pub fn with_encoder(out: W, config: CompilerConfig, enc: L) -> Self {
        Self {
            out,
            enc,
            config,
            state: Default::default(),
            chars: String::new(),
            level: 0,
            omit_root: false,
            package: false,
            depth: 0,
            closed: false,
            trace: Default::default(),
        }
    }

    pub fn state(&self) -> CompilerState {
        self.state
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Character data received so far.
    pub fn text(&self) -> &str {
        &self.chars
    }

    /// Whether the compiler refuses further events.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Yield the output sink.
    ///
    /// The output is complete only if
    ///   [`ContentHandler::end_document`] succeeded.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Handle a single event.
    ///
    /// This traces the event,
    ///   refuses it if the compiler is closed,
    ///   and closes the compiler if `f` fails.
    fn step<F>(&mut self, event: Arguments, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.trace.trace_event_begin(self.state, self.level, &event);

        let result = match self.closed {
            true => Err(Error::Closed),
            false => f(self),
        };

        if result.is_err() {
            self.closed = true;
        }

        self.trace.trace_event_end(self.state, self.level, &result);
        result
    }

    fn indent(&mut self) -> Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(INDENT)?;
        }

        Ok(())
    }

    /// Write a single indented line.
    fn line(&mut self, text: &str) -> Result<()> {
        self.line_fmt(format_args!("{text}"))
    }

    fn line_fmt(&mut self, text: Arguments) -> Result<()> {
        self.indent()?;
        self.out.write_fmt(text)?;
        self.out.write_all(b"\n")?;

        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// Open a block with the line `head`.
    fn open(&mut self, head: Arguments) -> Result<()> {
        self.line_fmt(head)?;
        self.depth += 1;

        Ok(())
    }

    /// Close the innermost block with the line `tail`.
    fn close(&mut self, tail: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.line(tail)
    }

    /// Write a call whose arguments are all string literals.
    ///
    /// This writes `{callee}(` followed by the literal for each of `args`
    ///   and then `tail`,
    ///     which closes the call.
    fn write_call(
        &mut self,
        callee: &str,
        args: &[&str],
        tail: &str,
    ) -> Result<()> {
        self.indent()?;
        write!(self.out, "{callee}(")?;

        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.write_all(b", ")?;
            }

            self.enc.write_string_literal(&mut self.out, arg)?;
        }

        self.out.write_all(tail.as_bytes())?;
        self.out.write_all(b"\n")?;

        Ok(())
    }

    /// Ensure that the entry point is open so that replay calls may be
    ///   emitted,
    ///     declaring the default type and entry point as necessary.
    fn ensure_body(&mut self) -> Result<()> {
        use CompilerState::*;

        match self.state {
            Initial | PackageDeclared => {
                let name = self.config.default_type.clone();
                self.declare_type(&name)?;
                self.open_entry("")
            }
            TypeDeclared => self.open_entry(""),
            BodyOpen => Ok(()),
        }
    }

    fn declare_package(&mut self, name: &str) -> Result<()> {
        self.open(format_args!("pub mod {name} {{"))?;
        self.package = true;
        self.state = CompilerState::PackageDeclared;

        Ok(())
    }

    /// Declare an uninhabited type and open its `impl` block.
    fn declare_type(&mut self, name: &str) -> Result<()> {
        self.line_fmt(format_args!("pub enum {name} {{}}"))?;
        self.blank()?;
        self.open(format_args!("impl {name} {{"))?;
        self.state = CompilerState::TypeDeclared;

        Ok(())
    }

    /// Open the entry point with the extra parameters `args`.
    ///
    /// Unless the root is omitted,
    ///   the body is wrapped in a closure so that `end_document` is
    ///   replayed even if an earlier replay call fails.
    fn open_entry(&mut self, args: &str) -> Result<()> {
        let rt = self.config.runtime_path.clone();
        let args = args.trim();
        let sep = if args.is_empty() { "" } else { ", " };

        self.line("#[allow(unused_mut, unused_variables)]")?;
        self.open(format_args!(
            "pub fn emit<S: {rt}::ContentHandler + ?Sized>\
               (sink: &mut S{sep}{args}) -> {RESULT_TY} {{"
        ))?;
        self.line_fmt(format_args!(
            "let mut attrs = {rt}::Attributes::new();"
        ))?;

        if !self.omit_root {
            self.open(format_args!("let result = (|| -> {RESULT_TY} {{"))?;
            self.line("sink.start_document()?;")?;
        }

        self.state = CompilerState::BodyOpen;
        Ok(())
    }

    /// Close every open block and emit the text buffer.
    fn finalize(&mut self) -> Result<()> {
        self.line("Ok(())")?;

        if !self.omit_root {
            self.close("})();")?;
            self.line("let end = sink.end_document();")?;
            self.line("result.and(end)")?;
        }

        self.close("}")?;
        self.blank()?;
        self.line("#[allow(dead_code)]")?;

        self.indent()?;
        self.out.write_all(b"const CHARS: &'static str = ")?;
        self.enc.write_buffer_literal(&mut self.out, &self.chars)?;
        self.out.write_all(b";\n")?;

        self.close("}")?;

        if self.package {
            self.close("}")?;
        }

        self.out.flush()?;
        self.closed = true;

        Ok(())
    }

    fn directive(&mut self, directive: Directive, data: &str) -> Result<()> {
        if !directive.permitted_in(self.state) {
            return Err(Error::StructuralOrder {
                directive,
                state: self.state,
            });
        }

        match directive {
            Directive::Package => self.declare_package(data.trim()),
            Directive::Class => self.declare_type(data.trim()),
            Directive::Args => self.open_entry(data),
            Directive::OmitRoot => {
                self.omit_root = true;
                Ok(())
            }
            Directive::Code => {
                self.ensure_body()?;
                self.line(data)
            }
        }
    }

    /// Whether the element at the current level is the omitted root.
    fn is_omitted_root(&self) -> bool {
        self.omit_root && self.level == 1
    }
}

impl<W: Write, L: LiteralEncoder> ContentHandler for Compiler<W, L> {
    type Error = Error;

    fn start_document(&mut self) -> Result<()> {
        self.step(format_args!("start of document"), |c| c.line(BANNER))
    }

    fn end_document(&mut self) -> Result<()> {
        self.step(format_args!("end of document"), |c| {
            c.ensure_body()?;
            c.finalize()
        })
    }

    fn start_prefix_mapping(
        &mut self,
        prefix: &str,
        uri: &str,
    ) -> Result<()> {
        self.step(
            format_args!("prefix mapping `{prefix}` => `{uri}`"),
            |c| {
                c.ensure_body()?;
                c.write_call(
                    "sink.start_prefix_mapping",
                    &[prefix, uri],
                    ")?;",
                )
            },
        )
    }

    fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()> {
        self.step(format_args!("end of prefix mapping `{prefix}`"), |c| {
            c.write_call("sink.end_prefix_mapping", &[prefix], ")?;")
        })
    }

    fn start_element(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
        attrs: &Attributes,
    ) -> Result<()> {
        self.step(format_args!("start of element `{qname}`"), |c| {
            c.ensure_body()?;
            c.level += 1;

            if c.is_omitted_root() {
                return Ok(());
            }

            c.line("attrs.clear();")?;

            for attr in attrs {
                c.write_call(
                    "attrs.add",
                    &[
                        attr.uri.as_str(),
                        attr.local.as_str(),
                        attr.qname.as_str(),
                        attr.ty.as_str(),
                        attr.value.as_str(),
                    ],
                    ");",
                )?;
            }

            c.write_call(
                "sink.start_element",
                &[uri, local, qname],
                ", &attrs)?;",
            )
        })
    }

    fn end_element(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
    ) -> Result<()> {
        self.step(format_args!("end of element `{qname}`"), |c| {
            if c.level == 0 {
                return Err(Error::UnmatchedEnd(qname.into()));
            }

            let omitted = c.is_omitted_root();
            c.level -= 1;

            match omitted {
                true => Ok(()),
                false => c.write_call(
                    "sink.end_element",
                    &[uri, local, qname],
                    ")?;",
                ),
            }
        })
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.step(
            format_args!("{} byte(s) of character data", text.len()),
            |c| {
                c.ensure_body()?;

                let start = c.chars.len();
                c.chars.push_str(text);
                let end = c.chars.len();

                c.line_fmt(format_args!(
                    "sink.characters(&Self::CHARS[{start}..{end}])?;"
                ))
            },
        )
    }

    fn ignorable_whitespace(&mut self, text: &str) -> Result<()> {
        self.step(
            format_args!("{} byte(s) of ignorable whitespace", text.len()),
            |_| Ok(()),
        )
    }

    fn processing_instruction(
        &mut self,
        target: &str,
        data: &str,
    ) -> Result<()> {
        self.step(
            format_args!("processing instruction `<?{target} ...?>`"),
            |c| match Directive::from_target(target) {
                Some(directive) => c.directive(directive, data),
                None => {
                    c.ensure_body()?;
                    c.write_call(
                        "sink.processing_instruction",
                        &[target, data],
                        ")?;",
                    )
                }
            },
        )
    }

    fn skipped_entity(&mut self, name: &str) -> Result<()> {
        self.step(format_args!("skipped entity `&{name};`"), |_| {
            Err(Error::UnsupportedEvent(name.into()))
        })
    }
}
