// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! scheduler and style machinery call at each stage. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! This is also the engine's error-reporting channel: recoverable usage
//! errors (registering an invisible component, double-registering) are
//! reported as [`UsageErrorEvent`]s and treated as no-ops, so one broken
//! widget never stops the frame loop.

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the frame loop is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Node-tree evaluation (dirty drains, world rectangles).
    Evaluate,
    /// Layout-group repacking.
    Layout,
    /// Scheduler list refresh (staged additions/removals).
    Refresh,
    /// Component update dispatch.
    Update,
    /// Component draw dispatch.
    Draw,
}

/// A recoverable misuse of the scheduling API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UsageErrorKind {
    /// A stale component handle was enqueued for addition.
    AddStale,
    /// An invisible component was enqueued for addition.
    AddInvisible,
    /// A component already on the live list was enqueued again.
    AddDuplicate,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Emitted when a scheduling call was ignored as a usage error.
#[derive(Clone, Copy, Debug)]
pub struct UsageErrorEvent {
    /// What went wrong.
    pub kind: UsageErrorKind,
    /// Raw slot index of the offending component.
    pub component_index: u32,
}

/// Emitted when pointer focus moves to a different component (or to none).
#[derive(Clone, Copy, Debug)]
pub struct FocusChangeEvent {
    /// Raw slot index of the previously focused component, if any.
    pub previous: Option<u32>,
    /// Raw slot index of the newly focused component, if any.
    pub current: Option<u32>,
}

/// Per-refresh summary of scheduler list maintenance.
#[derive(Clone, Copy, Debug)]
pub struct RefreshSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Components on the live list after the refresh.
    pub live: u32,
    /// Components inserted this refresh (all order buckets).
    pub added: u32,
    /// Components removed this refresh.
    pub removed: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a frame-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a scheduling call was ignored as a usage error.
    fn on_usage_error(&mut self, e: &UsageErrorEvent) {
        _ = e;
    }

    /// Called when pointer focus changes.
    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        _ = e;
    }

    /// Called with a per-refresh list-maintenance summary.
    fn on_refresh(&mut self, s: &RefreshSummary) {
        _ = s;
    }

    /// Called when a style lookup fell back to the neutral style.
    fn on_style_fallback(&mut self, name: &str) {
        _ = name;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`UsageErrorEvent`].
    #[inline]
    pub fn usage_error(&mut self, e: &UsageErrorEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_usage_error(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FocusChangeEvent`].
    #[inline]
    pub fn focus_change(&mut self, e: &FocusChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_focus_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RefreshSummary`].
    #[inline]
    pub fn refresh(&mut self, s: &RefreshSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_refresh(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a style-fallback notice.
    #[inline]
    pub fn style_fallback(&mut self, name: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_style_fallback(name);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Refresh,
        });
        sink.on_usage_error(&UsageErrorEvent {
            kind: UsageErrorKind::AddDuplicate,
            component_index: 3,
        });
        sink.on_style_fallback("missing");
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Update,
        });
        tracer.style_fallback("missing");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            errors: Vec<UsageErrorKind>,
        }
        impl TraceSink for RecordingSink {
            fn on_usage_error(&mut self, e: &UsageErrorEvent) {
                self.errors.push(e.kind);
            }
        }

        let mut sink = RecordingSink { errors: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.usage_error(&UsageErrorEvent {
            kind: UsageErrorKind::AddInvisible,
            component_index: 7,
        });
        drop(tracer);
        assert_eq!(sink.errors, &[UsageErrorKind::AddInvisible]);
    }
}
