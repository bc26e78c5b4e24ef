// Rust literal encoding
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

//! Encoding of strings as Rust source literals.
//!
//! Every string that the compiler embeds in generated source passes
//!   through a [`LiteralEncoder`].
//! This is the only part of the system that is responsible for escaping,
//!   and so the only defense against injection of arbitrary code through
//!   document data.
//! Directive payloads are the exception:
//!   they are trusted source text and are emitted verbatim.
//!
//! Structural literals
//!   (element and attribute names, namespace URIs)
//!   repeat throughout a document;
//!     [`CachingEncoder`] avoids escaping the same value more than once.

use fxhash::FxHashMap;
use std::{
    borrow::Cow,
    cell::RefCell,
    io::{self, Write},
};

/// Produce Rust literal expressions from raw strings.
///
/// Encoders may perform caching and so use interior mutability for any
///   internal state.
pub trait LiteralEncoder: Default {
    /// Escape `value` so that it may be placed between the double quotes
    ///   of a Rust string literal.
    ///
    /// The literal must evaluate to exactly `value`.
    fn escape_str(value: &str) -> Cow<'_, str>;

    /// Write a string literal expression evaluating to `value`.
    fn write_string_literal<W: Write>(
        &self,
        sink: &mut W,
        value: &str,
    ) -> io::Result<()> {
        write_quoted(sink, &Self::escape_str(value))
    }

    /// Write the literal for the shared text buffer of a document.
    ///
    /// This is invoked once per compilation and may be very large;
    ///   it should not be cached.
    fn write_buffer_literal<W: Write>(
        &self,
        sink: &mut W,
        buffer: &str,
    ) -> io::Result<()> {
        write_quoted(sink, &Self::escape_str(buffer))
    }
}

fn write_quoted<W: Write>(sink: &mut W, escaped: &str) -> io::Result<()> {
    sink.write_all(b"\"")?;
    sink.write_all(escaped.as_bytes())?;
    sink.write_all(b"\"")
}

/// Encode as ordinary (non-raw) Rust string literals.
///
/// Non-ASCII characters are written as-is,
///   since generated source is always UTF-8.
/// Control characters and Unicode bidirectional formatting characters are
///   escaped;
///     the latter are rejected by `rustc` within literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustLiteral;

impl RustLiteral {
    fn needs_escape(c: char) -> bool {
        matches!(
            c,
            '"' | '\\'
                | '\u{061c}'
                | '\u{200e}'
                | '\u{200f}'
                | '\u{202a}'..='\u{202e}'
                | '\u{2066}'..='\u{2069}'
        ) || c.is_control()
    }
}

impl LiteralEncoder for RustLiteral {
    fn escape_str(value: &str) -> Cow<'_, str> {
        let first = match value.find(Self::needs_escape) {
            None => return Cow::Borrowed(value),
            Some(i) => i,
        };

        let mut escaped = String::with_capacity(value.len() + 8);
        escaped.push_str(&value[..first]);

        for c in value[first..].chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                '\0' => escaped.push_str("\\0"),
                c if Self::needs_escape(c) => {
                    escaped.push_str(&format!("\\u{{{:x}}}", c as u32))
                }
                c => escaped.push(c),
            }
        }

        Cow::Owned(escaped)
    }
}

/// Cache escaped representations of strings.
///
/// Only values that required escaping are cached;
///   values that are already suitable for a literal are borrowed
///   directly.
#[derive(Debug, Default)]
pub struct CachingEncoder<L: LiteralEncoder> {
    /// Inner [`LiteralEncoder`] to be invoked to populate the cache.
    inner: L,
    /// Map from raw values to their escaped representation.
    escaped: RefCell<FxHashMap<String, String>>,
}

#[cfg(test)]
impl<L: LiteralEncoder> CachingEncoder<L> {
    /// Number of cached escaped values.
    fn cache_len(&self) -> usize {
        self.escaped.borrow().len()
    }
}

impl<L: LiteralEncoder> LiteralEncoder for CachingEncoder<L> {
    #[inline]
    fn escape_str(value: &str) -> Cow<'_, str> {
        L::escape_str(value)
    }

    fn write_string_literal<W: Write>(
        &self,
        sink: &mut W,
        value: &str,
    ) -> io::Result<()> {
        if let Some(escaped) = self.escaped.borrow().get(value) {
            return write_quoted(sink, escaped);
        }

        match L::escape_str(value) {
            Cow::Borrowed(same) => write_quoted(sink, same),
            Cow::Owned(escaped) => {
                write_quoted(sink, &escaped)?;
                self.escaped.borrow_mut().insert(value.into(), escaped);
                Ok(())
            }
        }
    }

    #[inline]
    fn write_buffer_literal<W: Write>(
        &self,
        sink: &mut W,
        buffer: &str,
    ) -> io::Result<()> {
        self.inner.write_buffer_literal(sink, buffer)
    }
}

pub type DefaultEncoder = CachingEncoder<RustLiteral>;

/// Rust string literal expression evaluating to `value`.
pub fn string_literal(value: &str) -> String {
    format!("\"{}\"", RustLiteral::escape_str(value))
}

/// Rust string literal expression for a shared text buffer.
///
/// This is equivalent to [`string_literal`];
///   the generated code slices windows out of the resulting `&str`.
pub fn buffer_literal(buffer: &str) -> String {
    string_literal(buffer)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Parse a literal produced by [`RustLiteral`] back into its value,
    ///   following the Rust escape rules for the escapes that it
    ///   produces.
    fn eval_literal(lit: &str) -> String {
        let inner = lit
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .expect("literal must be quoted");

        let mut out = String::new();
        let mut chars = inner.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                assert_ne!(c, '"', "unescaped quote in {lit}");
                out.push(c);
                continue;
            }

            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some('u') => {
                    assert_eq!(chars.next(), Some('{'));
                    let hex = chars
                        .by_ref()
                        .take_while(|c| *c != '}')
                        .collect::<String>();
                    let code = u32::from_str_radix(&hex, 16).unwrap();
                    out.push(char::from_u32(code).unwrap());
                }
                other => panic!("unexpected escape {other:?} in {lit}"),
            }
        }

        out
    }

    #[test]
    fn plain_value_is_borrowed() {
        assert!(matches!(
            RustLiteral::escape_str("plain value"),
            Cow::Borrowed("plain value")
        ));
    }

    #[test]
    fn empty_string() {
        assert_eq!(string_literal(""), r#""""#);
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(string_literal(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }

    #[test]
    fn escapes_whitespace_controls() {
        assert_eq!(string_literal("a\nb\r\tc\0"), r#""a\nb\r\tc\0""#);
        assert_eq!(string_literal("\u{7f}\u{1b}"), r#""\u{7f}\u{1b}""#);
    }

    #[test]
    fn retains_non_ascii() {
        assert_eq!(string_literal("wörld 日本 🦀"), "\"wörld 日本 🦀\"");
    }

    #[test]
    fn escapes_bidi_formatting() {
        assert_eq!(string_literal("a\u{202e}b"), r#""a\u{202e}b""#);
        assert_eq!(string_literal("\u{2067}"), r#""\u{2067}""#);
    }

    #[test]
    fn literals_evaluate_to_original_value() {
        for value in [
            "",
            "plain",
            "\"quoted\"",
            "back\\slash",
            "multi\nline\r\n",
            "ünïcödé \u{202a}\u{2069} \u{85}",
            "trailing backslash \\",
            "{braces} and u{0}",
        ] {
            assert_eq!(eval_literal(&string_literal(value)), value);
        }
    }

    #[test]
    fn buffer_literal_matches_string_literal() {
        assert_eq!(buffer_literal("a\"b"), string_literal("a\"b"));
    }

    mod cache {
        use super::*;

        fn write(sut: &DefaultEncoder, value: &str) -> String {
            let mut buf = Vec::new();
            sut.write_string_literal(&mut buf, value).unwrap();
            String::from_utf8(buf).unwrap()
        }

        #[test]
        fn caches_only_escaped_values() {
            let sut = DefaultEncoder::default();

            assert_eq!(write(&sut, "plain"), "\"plain\"");
            assert_eq!(sut.cache_len(), 0);

            assert_eq!(write(&sut, "a\"b"), r#""a\"b""#);
            assert_eq!(sut.cache_len(), 1);

            // Served from cache.
            assert_eq!(write(&sut, "a\"b"), r#""a\"b""#);
            assert_eq!(sut.cache_len(), 1);
        }

        #[test]
        fn buffer_literal_bypasses_cache() {
            let sut = DefaultEncoder::default();
            let mut buf = Vec::new();

            sut.write_buffer_literal(&mut buf, "x\ny").unwrap();

            assert_eq!(buf, br#""x\ny""#);
            assert_eq!(sut.cache_len(), 0);
        }
    }
}
