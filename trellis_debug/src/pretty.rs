// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable one-line-per-event trace output.

use std::io::Write;

use trellis_core::trace::{
    FocusChangeEvent, PhaseBeginEvent, PhaseEndEvent, RefreshSummary, TraceSink, UsageErrorEvent,
};

/// A [`TraceSink`] that writes one line per event to any [`Write`]
/// destination.
///
/// Write errors are swallowed: diagnostics must never take down the frame
/// loop they are observing.
#[derive(Debug)]
pub struct PrettySink<W: Write> {
    out: W,
}

impl<W: Write> PrettySink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl PrettySink<std::io::Stdout> {
    /// Creates a sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TraceSink for PrettySink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(self.out, "[{:>6}] >> {:?}", e.frame_index, e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(self.out, "[{:>6}] << {:?}", e.frame_index, e.phase);
    }

    fn on_usage_error(&mut self, e: &UsageErrorEvent) {
        let _ = writeln!(
            self.out,
            "usage error: {:?} (component {})",
            e.kind, e.component_index
        );
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        let _ = writeln!(self.out, "focus: {:?} -> {:?}", e.previous, e.current);
    }

    fn on_refresh(&mut self, s: &RefreshSummary) {
        let _ = writeln!(
            self.out,
            "[{:>6}] refresh: live {} (+{} -{})",
            s.frame_index, s.live, s.added, s.removed
        );
    }

    fn on_style_fallback(&mut self, name: &str) {
        let _ = writeln!(self.out, "style fallback: {name:?} missing, using neutral");
    }
}
