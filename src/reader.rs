// XML event reader
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

//! Parse XML files into an [`Event`] stream.
//!
//! This uses [`quick_xml`] as the parser,
//!   with namespace resolution provided by [`NsReader`].
//! The resulting stream is what a namespace-aware, non-validating reader
//!   would report:
//!
//!   - `xmlns` and `xmlns:*` attributes are reported as
//!     [`Event::StartPrefixMapping`] before the element on which they
//!     appear and [`Event::EndPrefixMapping`] after its end,
//!       rather than as attributes;
//!   - empty elements (`<foo />`) produce both a start and an end;
//!   - CDATA sections are reported as character data;
//!   - whitespace outside of the root element,
//!       comments,
//!       and the doctype
//!       are not reported at all;
//!   - every attribute has the type `CDATA`.

mod error;

pub use error::{Error, SpanlessError};

use crate::{
    event::{Event, Name},
    sink::{Attr, Attributes},
};
use quick_xml::{
    events::{BytesDecl, BytesStart, Event as QuickXmlEvent},
    name::{PrefixDeclaration, QName, ResolveResult},
    NsReader,
};
use std::{borrow::Cow, collections::VecDeque, io::BufRead, result};

pub type Result<T> = result::Result<T, Error>;

type SpanlessResult<T> = result::Result<T, SpanlessError>;

/// Attribute type reported by a non-validating reader.
pub const ATTR_TYPE_CDATA: &str = "CDATA";

/// An element that has been opened but not yet closed.
#[derive(Debug)]
struct Scope {
    qname: String,

    /// Namespace prefixes declared on this element,
    ///   in declaration order.
    prefixes: Vec<String>,
}

/// Parse XML into an [`Event`] stream.
///
/// This reader is intended to be used as an [`Iterator`].
///
/// A single event from the underlying reader may produce several
///   [`Event`]s
///     (e.g. prefix mappings followed by an element start),
///     and others may produce none at all,
///   so events are buffered.
/// Parsing takes place when that buffer is exhausted and the next event is
///   requested
///     (see [`XmlEventReader::refill_buf`]).
///
/// The stream always begins with [`Event::StartDocument`] and,
///   if successful,
///   ends with [`Event::EndDocument`].
/// After an error,
///   the iterator yields [`None`].
pub struct XmlEventReader<B: BufRead> {
    /// Inner parser.
    reader: NsReader<B>,

    /// Buffer for [`NsReader`].
    readbuf: Vec<u8>,

    /// [`Event`] buffer populated upon receiving a new event from
    ///   `reader`.
    evbuf: VecDeque<Event>,

    /// Open elements,
    ///   innermost last.
    scopes: Vec<Scope>,

    /// Whether the root element has been opened.
    root_seen: bool,

    started: bool,
    done: bool,
}

impl<B: BufRead> XmlEventReader<B> {
    pub fn new(reader: B) -> Self {
        let mut reader = NsReader::from_reader(reader);

        // Empty elements are reported as a start and end pair,
        //   which is all that a content handler is able to observe.
        reader.config_mut().expand_empty_elements = true;

        Self {
            reader,
            readbuf: Vec::new(),
            evbuf: VecDeque::with_capacity(8),
            scopes: Vec::new(),
            root_seen: false,
            started: false,
            done: false,
        }
    }

    /// Parse using the underlying [`NsReader`] and populate the
    ///   [`Event`] buffer.
    ///
    /// This is intended to be invoked once the buffer has been depleted by
    ///   [`XmlEventReader::next`].
    /// The buffer may remain empty if the parsed event is not reported.
    pub fn refill_buf(&mut self) -> Result<()> {
        if !self.started {
            self.started = true;
            self.evbuf.push_back(Event::StartDocument);

            return Ok(());
        }

        self.readbuf.clear();

        let pos = self.reader.buffer_position() as u64;

        let ev = self
            .reader
            .read_event_into(&mut self.readbuf)
            .map_err(Error::from_at(pos))?;

        match ev {
            QuickXmlEvent::Eof => {
                if let Some(scope) = self.scopes.last() {
                    return Err(SpanlessError::UnclosedElement(
                        scope.qname.clone(),
                    )
                    .at(pos));
                }

                if !self.root_seen {
                    return Err(SpanlessError::MissingRoot.at(pos));
                }

                self.done = true;
                self.evbuf.push_back(Event::EndDocument);
            }

            QuickXmlEvent::Start(ele) => Self::parse_element_open(
                &self.reader,
                &mut self.evbuf,
                &mut self.scopes,
                &mut self.root_seen,
                &ele,
            )
            .map_err(Error::from_at(pos))?,

            // Should not occur since we expand empty elements,
            //   but there is no harm in handling it.
            QuickXmlEvent::Empty(ele) => {
                Self::parse_element_open(
                    &self.reader,
                    &mut self.evbuf,
                    &mut self.scopes,
                    &mut self.root_seen,
                    &ele,
                )
                .map_err(Error::from_at(pos))?;

                Self::parse_element_close(
                    &self.reader,
                    &mut self.evbuf,
                    &mut self.scopes,
                    ele.name(),
                )
                .map_err(Error::from_at(pos))?;
            }

            QuickXmlEvent::End(ele) => Self::parse_element_close(
                &self.reader,
                &mut self.evbuf,
                &mut self.scopes,
                ele.name(),
            )
            .map_err(Error::from_at(pos))?,

            QuickXmlEvent::Text(bytes) => {
                let text =
                    unescape_text(&bytes).map_err(Error::from_at(pos))?;

                Self::push_text(&mut self.evbuf, &self.scopes, text.into())
                    .map_err(Error::from_at(pos))?;
            }

            // CDATA has no references to expand.
            QuickXmlEvent::CData(bytes) => {
                let text = SpanlessError::utf8(&bytes)
                    .map(normalize_line_ends)
                    .map_err(Error::from_at(pos))?;

                Self::push_text(&mut self.evbuf, &self.scopes, text)
                    .map_err(Error::from_at(pos))?;
            }

            QuickXmlEvent::PI(pi) => {
                let target = SpanlessError::utf8(pi.target())
                    .map_err(Error::from_at(pos))?;

                // The content includes the whitespace separating it from
                //   the target.
                let data = SpanlessError::utf8(pi.content())
                    .map_err(Error::from_at(pos))?
                    .trim_start_matches(is_xml_whitespace);

                self.evbuf.push_back(Event::ProcessingInstruction {
                    target: target.into(),
                    data: normalize_line_ends(data).into_owned(),
                });
            }

            QuickXmlEvent::Decl(decl) => {
                Self::validate_decl(&decl).map_err(Error::from_at(pos))?
            }

            // Neither have a representation as events.
            QuickXmlEvent::Comment(..) | QuickXmlEvent::DocType(..) => (),
        }

        Ok(())
    }

    /// Validate that an XML declaration contains expected values.
    ///
    /// A declaration looks like `<?xml version="1.0" encoding="utf-8"?>`,
    ///   where `@encoding` is optional but `@version` is not.
    ///
    /// We expect version 1.0 and UTF-8 encoding,
    ///   since the input is never transcoded.
    fn validate_decl(decl: &BytesDecl) -> SpanlessResult<()> {
        let ver = decl.version()?;

        if &ver[..] != b"1.0" {
            return Err(SpanlessError::UnsupportedXmlVersion(
                String::from_utf8_lossy(&ver).into_owned(),
            ));
        }

        if let Some(enc) = decl.encoding() {
            let enc = enc?;

            if !enc.eq_ignore_ascii_case(b"utf-8") {
                return Err(SpanlessError::UnsupportedEncoding(
                    String::from_utf8_lossy(&enc).into_owned(),
                ));
            }
        }

        Ok(())
    }

    /// Parse an opening element and its attributes into [`Event`]s.
    ///
    /// The first element opened at the top level is the root;
    ///   any other is an error.
    ///
    /// Namespace declarations produce [`Event::StartPrefixMapping`]s,
    ///   which precede the [`Event::StartElement`];
    ///     all other attributes are reported with the element in their
    ///     original order.
    fn parse_element_open(
        reader: &NsReader<B>,
        evbuf: &mut VecDeque<Event>,
        scopes: &mut Vec<Scope>,
        root_seen: &mut bool,
        ele: &BytesStart,
    ) -> SpanlessResult<()> {
        // Only the first element may be opened at the top level.
        if scopes.is_empty() {
            if *root_seen {
                return Err(SpanlessError::MultipleRoots(
                    SpanlessError::utf8(ele.name().as_ref())?.into(),
                ));
            }

            *root_seen = true;
        }

        let mut prefixes = Vec::new();
        let mut attrs = Attributes::new();

        for result in ele.attributes() {
            let attr = result?;
            let value = unescape_attr_value(&attr.value)?;

            match attr.key.as_namespace_binding() {
                Some(decl) => {
                    let prefix = match decl {
                        PrefixDeclaration::Default => String::new(),
                        PrefixDeclaration::Named(prefix) => {
                            SpanlessError::utf8(prefix)?.into()
                        }
                    };

                    evbuf.push_back(Event::StartPrefixMapping {
                        prefix: prefix.clone(),
                        uri: value,
                    });

                    prefixes.push(prefix);
                }

                None => {
                    let (ns, local) = reader.resolve_attribute(attr.key);

                    attrs.push(Attr {
                        uri: resolve_uri(ns)?,
                        local: SpanlessError::utf8(local.as_ref())?.into(),
                        qname: SpanlessError::utf8(attr.key.as_ref())?.into(),
                        ty: ATTR_TYPE_CDATA.into(),
                        value,
                    });
                }
            }
        }

        let name = Self::resolve_name(reader, ele.name())?;

        scopes.push(Scope {
            qname: name.qname.clone(),
            prefixes,
        });

        evbuf.push_back(Event::StartElement(name, attrs));

        Ok(())
    }

    /// Parse a closing element into [`Event`]s.
    ///
    /// The [`Event::EndElement`] is followed by an
    ///   [`Event::EndPrefixMapping`] for each prefix declared on the
    ///   element.
    fn parse_element_close(
        reader: &NsReader<B>,
        evbuf: &mut VecDeque<Event>,
        scopes: &mut Vec<Scope>,
        qname: QName,
    ) -> SpanlessResult<()> {
        let name = Self::resolve_name(reader, qname)?;

        // `quick-xml` checks that end tags match their start,
        //   so this should always be present.
        let prefixes = scopes
            .pop()
            .map(|scope| scope.prefixes)
            .unwrap_or_default();

        evbuf.push_back(Event::EndElement(name));
        evbuf.extend(prefixes.into_iter().map(Event::EndPrefixMapping));

        Ok(())
    }

    fn resolve_name(
        reader: &NsReader<B>,
        qname: QName,
    ) -> SpanlessResult<Name> {
        let (ns, local) = reader.resolve_element(qname);

        Ok(Name {
            uri: resolve_uri(ns)?,
            local: SpanlessError::utf8(local.as_ref())?.into(),
            qname: SpanlessError::utf8(qname.as_ref())?.into(),
        })
    }

    /// Report character data.
    ///
    /// Outside of the root element,
    ///   only whitespace is permitted,
    ///   and it is not reported.
    fn push_text(
        evbuf: &mut VecDeque<Event>,
        scopes: &[Scope],
        text: Cow<'_, str>,
    ) -> SpanlessResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        if scopes.is_empty() {
            return match text.trim_matches(is_xml_whitespace) {
                "" => Ok(()),
                _ => Err(SpanlessError::TextOutsideRoot(text.into_owned())),
            };
        }

        evbuf.push_back(Event::Characters(text.into_owned()));
        Ok(())
    }
}

/// Normalize line endings and expand references in character data.
///
/// Line endings are normalized before references are expanded,
///   so that `&#13;` is reported as a carriage return.
fn unescape_text(raw: &[u8]) -> SpanlessResult<String> {
    let text = normalize_line_ends(SpanlessError::utf8(raw)?);

    Ok(quick_xml::escape::unescape(&text)?.into_owned())
}

/// Normalize an attribute value as a non-validating reader would for an
///   attribute of type `CDATA`,
///     then expand references.
///
/// Each literal tab,
///   line feed,
///   or line ending becomes a single space;
///     whitespace introduced by a character reference is kept.
fn unescape_attr_value(raw: &[u8]) -> SpanlessResult<String> {
    let value = normalize_line_ends(SpanlessError::utf8(raw)?);

    let value = if value.contains(['\t', '\n']) {
        Cow::Owned(value.replace(['\t', '\n'], " "))
    } else {
        value
    };

    Ok(quick_xml::escape::unescape(&value)?.into_owned())
}

/// Replace each `\r\n` pair and each lone `\r` with `\n`.
fn normalize_line_ends(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Whitespace as defined by the XML `S` production.
fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn resolve_uri(ns: ResolveResult) -> SpanlessResult<String> {
    match ns {
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Bound(uri) => {
            Ok(SpanlessError::utf8(uri.as_ref())?.into())
        }
        ResolveResult::Unknown(prefix) => Err(SpanlessError::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

impl<B: BufRead> Iterator for XmlEventReader<B> {
    type Item = Result<Event>;

    /// Produce the next [`Event`] from the input.
    ///
    /// For more information on how this reader operates,
    ///   see [`XmlEventReader`].
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(ev) = self.evbuf.pop_front() {
                return Some(Ok(ev));
            }

            if self.done {
                return None;
            }

            if let Err(e) = self.refill_buf() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
