// Event sinks and replay runtime
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

//! Consumers of document events.
//!
//! This is the runtime used by generated code:
//!   the generated `emit` function accepts any [`ContentHandler`] and
//!   reuses a single [`Attributes`] collector for every element.
//!
//! [`Recorder`] collects events into owned [`Event`]s,
//!   which is useful for comparing a replay against its source document.

use crate::event::{Event, Name};
use std::convert::Infallible;

/// Receiver of document events.
///
/// Events arrive in document order and the handler may assume that they
///   are well-formed
///     (element starts and ends are balanced,
///       and the document is bracketed by
///       [`start_document`](ContentHandler::start_document) and
///       [`end_document`](ContentHandler::end_document)).
///
/// Any error returned by a handler aborts the producer.
pub trait ContentHandler {
    type Error;

    fn start_document(&mut self) -> Result<(), Self::Error>;

    fn end_document(&mut self) -> Result<(), Self::Error>;

    /// Begin the scope of a namespace prefix.
    ///
    /// This is invoked before the
    ///   [`start_element`](ContentHandler::start_element) of the element
    ///   on which the prefix is declared;
    ///     the default namespace has an empty `prefix`.
    fn start_prefix_mapping(
        &mut self,
        prefix: &str,
        uri: &str,
    ) -> Result<(), Self::Error>;

    fn end_prefix_mapping(&mut self, prefix: &str) -> Result<(), Self::Error>;

    fn start_element(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
        attrs: &Attributes,
    ) -> Result<(), Self::Error>;

    fn end_element(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
    ) -> Result<(), Self::Error>;

    fn characters(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Whitespace that is not significant to the document.
    ///
    /// This is ignored by default.
    fn ignorable_whitespace(&mut self, _text: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn processing_instruction(
        &mut self,
        target: &str,
        data: &str,
    ) -> Result<(), Self::Error>;

    fn skipped_entity(&mut self, name: &str) -> Result<(), Self::Error>;
}

/// A single attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub uri: String,
    pub local: String,
    pub qname: String,

    /// Attribute type.
    ///
    /// Non-validating readers always report `CDATA`.
    pub ty: String,

    pub value: String,
}

/// Ordered attributes of an element.
///
/// Generated code allocates one collector per replay and
///   [`clear`](Attributes::clear)s it before each element,
///     reusing its allocation.
/// Attribute order is preserved and duplicates are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes(Vec<Attr>);

impl Attributes {
    pub fn new() -> Self {
        Default::default()
    }

    /// Remove all attributes while retaining allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn add(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
        ty: &str,
        value: &str,
    ) {
        self.push(Attr {
            uri: uri.into(),
            local: local.into(),
            qname: qname.into(),
            ty: ty.into(),
            value: value.into(),
        })
    }

    pub fn push(&mut self, attr: Attr) {
        self.0.push(attr)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Attr> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Record each event that it receives.
///
/// This handler never fails.
#[derive(Debug, Default, PartialEq)]
pub struct Recorder(Vec<Event>);

impl Recorder {
    pub fn events(&self) -> &[Event] {
        &self.0
    }

    pub fn into_events(self) -> Vec<Event> {
        self.0
    }

    fn record(&mut self, ev: Event) -> Result<(), Infallible> {
        self.0.push(ev);
        Ok(())
    }
}

impl ContentHandler for Recorder {
    type Error = Infallible;

    fn start_document(&mut self) -> Result<(), Self::Error> {
        self.record(Event::StartDocument)
    }

    fn end_document(&mut self) -> Result<(), Self::Error> {
        self.record(Event::EndDocument)
    }

    fn start_prefix_mapping(
        &mut self,
        prefix: &str,
        uri: &str,
    ) -> Result<(), Self::Error> {
        self.record(Event::StartPrefixMapping {
            prefix: prefix.into(),
            uri: uri.into(),
        })
    }

    fn end_prefix_mapping(&mut self, prefix: &str) -> Result<(), Self::Error> {
        self.record(Event::EndPrefixMapping(prefix.into()))
    }

    fn start_element(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
        attrs: &Attributes,
    ) -> Result<(), Self::Error> {
        self.record(Event::StartElement(
            Name::new(uri, local, qname),
            attrs.clone(),
        ))
    }

    fn end_element(
        &mut self,
        uri: &str,
        local: &str,
        qname: &str,
    ) -> Result<(), Self::Error> {
        self.record(Event::EndElement(Name::new(uri, local, qname)))
    }

    fn characters(&mut self, text: &str) -> Result<(), Self::Error> {
        self.record(Event::Characters(text.into()))
    }

    fn ignorable_whitespace(&mut self, text: &str) -> Result<(), Self::Error> {
        self.record(Event::IgnorableWhitespace(text.into()))
    }

    fn processing_instruction(
        &mut self,
        target: &str,
        data: &str,
    ) -> Result<(), Self::Error> {
        self.record(Event::ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        })
    }

    fn skipped_entity(&mut self, name: &str) -> Result<(), Self::Error> {
        self.record(Event::SkippedEntity(name.into()))
    }
}
