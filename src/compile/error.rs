// Compiler errors
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

//! Errors while compiling events into source code.
//!
//! All errors are fatal;
//!   once an error has been returned,
//!   the [`Compiler`](super::Compiler) refuses further events.

use super::{CompilerState, Directive};
use std::{fmt::Display, io::Error as IoError};

#[derive(Debug)]
pub enum Error {
    /// A directive was received in a state that does not permit it.
    StructuralOrder {
        directive: Directive,
        state: CompilerState,
    },

    /// An event that has no replay representation,
    ///   such as a skipped entity.
    UnsupportedEvent(String),

    /// An element end was received with no open element.
    UnmatchedEnd(String),

    /// Failed to write to the output sink.
    Io(IoError),

    /// An event was received after the document was finalized or after
    ///   a previous error.
    ///
    /// This represents a bug in the driver of the compiler.
    Closed,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StructuralOrder { directive, state } => write!(
                f,
                "directive `{directive}` is not permitted \
                   when the compiler is in state `{state}` \
                   (expected {})",
                directive.expected_state(),
            ),
            Self::UnsupportedEvent(name) => write!(
                f,
                "unsupported event: skipped entity `&{name};` cannot be \
                   replayed"
            ),
            Self::UnmatchedEnd(qname) => write!(
                f,
                "end of element `{qname}` does not match any open element"
            ),
            Self::Io(e) => write!(f, "failed to write output: {e}"),
            Self::Closed => write!(
                f,
                "compiler received an event after it was finalized or \
                   after a previous error"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}
