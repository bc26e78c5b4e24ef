// Reader errors
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

//! Errors while reading XML into [`Event`](crate::Event)s.

use crate::tpwrap::quick_xml::XmlError;
use std::{fmt::Display, str::Utf8Error};

/// Reader error that has not yet been associated with a location in the
///   source document.
///
/// See [`SpanlessError::at`].
#[derive(Debug, PartialEq)]
pub enum SpanlessError {
    /// A UTF-8 error together with the byte slice that caused it.
    InvalidUtf8(Utf8Error, Vec<u8>),
    /// A name uses a namespace prefix that is not in scope.
    UnboundPrefix(String),
    /// XML 1.0 only.
    UnsupportedXmlVersion(String),
    /// Only UTF-8 input is supported.
    UnsupportedEncoding(String),
    /// Non-whitespace text before or after the root element.
    TextOutsideRoot(String),
    /// An element was found after the root element was closed.
    MultipleRoots(String),
    /// End of input was reached while an element was still open.
    UnclosedElement(String),
    /// The document has no root element.
    MissingRoot,

    Xml(XmlError),
}

impl SpanlessError {
    /// Interpret `bytes` as UTF-8.
    pub fn utf8(bytes: &[u8]) -> Result<&str, Self> {
        std::str::from_utf8(bytes)
            .map_err(|e| Self::InvalidUtf8(e, bytes.to_owned()))
    }

    /// Associate this error with a byte offset into the source document.
    pub fn at(self, offset: u64) -> Error {
        Error { kind: self, offset }
    }
}

impl Display for SpanlessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUtf8(inner, bytes) => write!(
                f,
                "{} for string `{}`",
                inner,
                String::from_utf8_lossy(bytes)
            ),
            Self::UnboundPrefix(prefix) => {
                write!(f, "namespace prefix `{prefix}` is not bound")
            }
            Self::UnsupportedXmlVersion(ver) => write!(
                f,
                "expected XML version `1.0`, \
                   but found unsupported version `{ver}`"
            ),
            Self::UnsupportedEncoding(enc) => write!(
                f,
                "expected `utf-8` or `UTF-8` encoding, \
                   but found unsupported encoding `{enc}`"
            ),
            Self::TextOutsideRoot(text) => write!(
                f,
                "text `{text}` is not permitted outside of the root element"
            ),
            Self::MultipleRoots(qname) => write!(
                f,
                "element `{qname}` follows the root element; \
                   a document may have only one root"
            ),
            Self::UnclosedElement(qname) => write!(
                f,
                "unexpected end of input: element `{qname}` is not closed"
            ),
            Self::MissingRoot => write!(f, "document has no root element"),
            Self::Xml(inner) => write!(f, "XML parse error: {inner}"),
        }
    }
}

impl std::error::Error for SpanlessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUtf8(inner, _) => Some(inner),
            Self::Xml(inner) => Some(inner),
            _ => None,
        }
    }
}

impl<E: Into<quick_xml::Error>> From<E> for SpanlessError {
    fn from(e: E) -> Self {
        Self::Xml(XmlError(e.into()))
    }
}

/// Error reading XML at a byte offset of the source document.
#[derive(Debug, PartialEq)]
pub struct Error {
    pub kind: SpanlessError,

    /// Byte offset at which the offending event began.
    pub offset: u64,
}

impl Error {
    /// Produce a function that converts an error into a [`SpanlessError`]
    ///   associated with `offset`.
    ///
    /// This is intended for use with [`Result::map_err`].
    pub fn from_at<E: Into<SpanlessError>>(
        offset: u64,
    ) -> impl FnOnce(E) -> Self {
        move |e| e.into().at(offset)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at byte {})", self.kind, self.offset)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
