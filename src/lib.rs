// replayc: XML event replay compiler
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

//! Compile XML documents into Rust code that replays their events.
//!
//! An XML document is read into a stream of [`Event`]s
//!   (see [`reader`]),
//!     which is fed into a [`Compiler`](compile::Compiler).
//! The compiler writes Rust source that,
//!   when built and invoked,
//!   issues the very same sequence of calls against any
//!   [`ContentHandler`].
//! All literal data
//!   (names, attribute values, namespaces, and text)
//!   are embedded in the generated source,
//!     so the original document is not needed at runtime.
//!
//! Generated code depends only on the runtime items re-exported at the
//!   root of this crate:
//!   [`ContentHandler`] and [`Attributes`].
//!
//! Directives
//! ==========
//! The shape of the generated source is controlled by processing
//!   instructions embedded in the input document;
//!     see [`compile::Directive`].
//! Any other processing instruction is replayed like any other event.

pub mod compile;
pub mod event;
pub mod literal;
pub mod pipeline;
pub mod reader;
pub mod sink;
pub mod tpwrap;

pub use event::{Event, Name};
pub use sink::{Attributes, ContentHandler};
