// Compiler tracing
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

//! Tracing for compilation.
//!
//! This provides human-readable traces on standard error any time an
//!   event is fed to the [`Compiler`](super::Compiler).
//! These traces are provided automatically when `cfg(test)`,
//!   which means that they are automatically included in the output of any
//!   test failure.
//!
//! Outside of tests,
//!   this can be enabled at build time using the
//!   `compiler-trace-stderr` feature flag
//!     (`cargo build --features compiler-trace-stderr`).
//!
//! _These traces are not meant to be machine-readable!_
//! Do not try to parse them since the format is subject to change without
//!   notice.

use super::{CompilerState, Error};
use std::fmt::Arguments;

pub(super) trait CompilerTrace: Default {
    /// Output the upper portion of an event trace.
    ///
    /// This begins the trace with the [`CompilerState`] and nesting level
    ///   prior to handling the event,
    ///     and a description of the event that was received.
    /// Post-transition tracing is handled by [`Self::trace_event_end`].
    ///
    /// There is no means to return an error and a failure to output the
    ///   trace should not interrupt processing.
    fn trace_event_begin(
        &mut self,
        st_orig: CompilerState,
        level: usize,
        event: &Arguments,
    );

    /// Output the lower portion of an event trace.
    ///
    /// There is no means to return an error and a failure to output the
    ///   trace should not interrupt processing.
    fn trace_event_end(
        &mut self,
        st_new: CompilerState,
        level: usize,
        result: &Result<(), Error>,
    );
}

/// Perform no tracing.
///
/// This should be used by default for non-test builds,
///   since tracing can incur a significant performance cost.
#[derive(Debug, PartialEq, Default)]
pub struct VoidTrace;

impl CompilerTrace for VoidTrace {
    fn trace_event_begin(
        &mut self,
        _st_orig: CompilerState,
        _level: usize,
        _event: &Arguments,
    ) {
        // Do nothing at all.
    }

    fn trace_event_end(
        &mut self,
        _st_new: CompilerState,
        _level: usize,
        _result: &Result<(), Error>,
    ) {
        // Do nothing at all.
    }
}

/// Human-readable [`CompilerTrace`].
///
/// See [module-level](super::trace) documentation for more information.
#[derive(Debug, PartialEq, Default)]
pub struct HumanReadableTrace;

impl CompilerTrace for HumanReadableTrace {
    fn trace_event_begin(
        &mut self,
        st_orig: CompilerState,
        level: usize,
        event: &Arguments,
    ) {
        eprint!(
            "\
[Compiler::step]
| ==> Compiler before event is {st_orig} (level {level}).
|
| ==> event: {event}
|\n",
        );
    }

    fn trace_event_end(
        &mut self,
        st_new: CompilerState,
        level: usize,
        result: &Result<(), Error>,
    ) {
        eprint!(
            "| ==> Compiler after event is {st_new} (level {level}).\n"
        );

        if let Err(err) = result {
            eprint!(
                "\
|
| ==> !!! error: {err}.
|  |  {err:?}\n",
            );
        }

        #[allow(unused_variables)]
        let cfg = ""; // so that this compiles without matching cfg
        #[cfg(feature = "compiler-trace-stderr")]
        #[allow(unused_variables)]
        let cfg = "feature = \"compiler-trace-stderr\"";
        #[cfg(test)] // takes precedence if both are set
        let cfg = "test";
        eprint!(
            "= note: this trace was output as a debugging aid \
                because `cfg({cfg})`.\n\n",
        );
    }
}

#[cfg(any(test, feature = "compiler-trace-stderr"))]
pub(super) type DefaultTrace = HumanReadableTrace;

#[cfg(not(any(test, feature = "compiler-trace-stderr")))]
pub(super) type DefaultTrace = VoidTrace;
