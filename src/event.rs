// Document events
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

//! Owned document events.
//!
//! An [`Event`] is the owned counterpart of a single
//!   [`ContentHandler`] call.
//! Readers produce streams of events
//!   (see [`crate::reader`]),
//!   and [`Event::feed`] dispatches an event into any handler,
//!     including the [`Compiler`](crate::compile::Compiler).

use crate::sink::{Attributes, ContentHandler};

/// Namespace-resolved name of an element.
///
/// The URI is empty if the name is not in any namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    pub uri: String,
    pub local: String,
    pub qname: String,
}

impl Name {
    pub fn new<U, L, Q>(uri: U, local: L, qname: Q) -> Self
    where
        U: Into<String>,
        L: Into<String>,
        Q: Into<String>,
    {
        Self {
            uri: uri.into(),
            local: local.into(),
            qname: qname.into(),
        }
    }

    /// A name in no namespace whose qualified name is its local name.
    pub fn local<S: Into<String>>(local: S) -> Self {
        let local = local.into();

        Self {
            uri: String::new(),
            qname: local.clone(),
            local,
        }
    }
}

/// A single document event.
///
/// This is a closed set;
///   each variant corresponds to exactly one [`ContentHandler`] method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument,
    EndDocument,

    /// A namespace prefix comes into scope.
    ///
    /// The default namespace is represented by an empty prefix.
    StartPrefixMapping { prefix: String, uri: String },

    /// A namespace prefix goes out of scope.
    EndPrefixMapping(String),

    StartElement(Name, Attributes),
    EndElement(Name),

    /// Character data.
    ///
    /// A reader may split contiguous character data into any number of
    ///   events.
    Characters(String),

    /// Whitespace that a validating reader has determined to be
    ///   insignificant.
    IgnorableWhitespace(String),

    /// A processing instruction.
    ///
    /// Some targets are interpreted by the compiler as directives;
    ///   see [`Directive`](crate::compile::Directive).
    ProcessingInstruction { target: String, data: String },

    /// An entity that the reader did not expand.
    SkippedEntity(String),
}

impl Event {
    /// Dispatch this event to the corresponding method of `handler`.
    pub fn feed<H: ContentHandler + ?Sized>(
        &self,
        handler: &mut H,
    ) -> Result<(), H::Error> {
        match self {
            Self::StartDocument => handler.start_document(),
            Self::EndDocument => handler.end_document(),
            Self::StartPrefixMapping { prefix, uri } => {
                handler.start_prefix_mapping(prefix, uri)
            }
            Self::EndPrefixMapping(prefix) => {
                handler.end_prefix_mapping(prefix)
            }
            Self::StartElement(name, attrs) => handler.start_element(
                &name.uri,
                &name.local,
                &name.qname,
                attrs,
            ),
            Self::EndElement(name) => {
                handler.end_element(&name.uri, &name.local, &name.qname)
            }
            Self::Characters(text) => handler.characters(text),
            Self::IgnorableWhitespace(text) => {
                handler.ignorable_whitespace(text)
            }
            Self::ProcessingInstruction { target, data } => {
                handler.processing_instruction(target, data)
            }
            Self::SkippedEntity(name) => handler.skipped_entity(name),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sink::Recorder;

    #[test]
    fn feed_dispatches_to_matching_handler_method() {
        let mut attrs = Attributes::new();
        attrs.add("", "id", "id", "CDATA", "7");

        let events = vec![
            Event::StartDocument,
            Event::StartPrefixMapping {
                prefix: "x".into(),
                uri: "urn:x".into(),
            },
            Event::StartElement(Name::new("urn:x", "root", "x:root"), attrs),
            Event::Characters("text".into()),
            Event::ProcessingInstruction {
                target: "pi".into(),
                data: "data".into(),
            },
            Event::EndElement(Name::new("urn:x", "root", "x:root")),
            Event::EndPrefixMapping("x".into()),
            Event::SkippedEntity("ent".into()),
            Event::EndDocument,
        ];

        let mut recorder = Recorder::default();

        for ev in &events {
            ev.feed(&mut recorder).unwrap();
        }

        assert_eq!(recorder.into_events(), events);
    }
}
