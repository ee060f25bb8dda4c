// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic frame driving and scripted input for tests and demos.
//!
//! The engine is frame-stepped and dt-driven, so exercising it end-to-end
//! only needs two things: a repeatable sequence of frame stamps and a
//! repeatable sequence of pointer snapshots. [`FrameDriver`] provides the
//! former (fixed timestep, no clock access), [`PointerScript`] the latter.
//! [`FrameStats`] aggregates externally measured frame times the same way
//! for every harness.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use trellis_core::input::PointerState;
use trellis_core::kurbo::Point;

/// One step of the frame driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStamp {
    /// Monotonically increasing frame counter, starting at 1.
    pub index: u64,
    /// Fixed delta time for this frame, in seconds.
    pub dt: f32,
    /// Accumulated time since the driver was created, in seconds.
    pub elapsed: f32,
}

/// A fixed-timestep frame driver.
///
/// Never reads a clock, so runs are reproducible down to float rounding.
#[derive(Clone, Copy, Debug)]
pub struct FrameDriver {
    dt: f32,
    index: u64,
    elapsed: f32,
}

impl FrameDriver {
    /// Creates a driver stepping `dt` seconds per frame.
    #[must_use]
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            index: 0,
            elapsed: 0.0,
        }
    }

    /// A driver stepping at 60 frames per second.
    #[must_use]
    pub fn at_60hz() -> Self {
        Self::new(1.0 / 60.0)
    }

    /// Advances one frame and returns its stamp.
    pub fn tick(&mut self) -> FrameStamp {
        self.index += 1;
        self.elapsed += self.dt;
        FrameStamp {
            index: self.index,
            dt: self.dt,
            elapsed: self.elapsed,
        }
    }
}

/// A prerecorded sequence of pointer snapshots.
///
/// Once the script runs out, the final snapshot (with transient edges like
/// clicks cleared) repeats forever.
#[derive(Clone, Debug, Default)]
pub struct PointerScript {
    steps: Vec<PointerState>,
    cursor: usize,
}

impl PointerScript {
    /// Creates an empty script; an idle pointer at the origin plays forever.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an arbitrary snapshot.
    pub fn push(&mut self, state: PointerState) -> &mut Self {
        self.steps.push(state);
        self
    }

    /// Appends an idle move to `position`.
    pub fn move_to(&mut self, position: Point) -> &mut Self {
        self.push(PointerState::at(position))
    }

    /// Appends a press at `position` (down edge plus held).
    pub fn press(&mut self, position: Point) -> &mut Self {
        let mut state = PointerState::at(position);
        state.primary_down = true;
        state.primary_held = true;
        self.push(state)
    }

    /// Appends a hold at `position` (button still down, no edge).
    pub fn hold(&mut self, position: Point) -> &mut Self {
        let mut state = PointerState::at(position);
        state.primary_held = true;
        self.push(state)
    }

    /// Appends a release at `position` (click edge).
    pub fn release(&mut self, position: Point) -> &mut Self {
        let mut state = PointerState::at(position);
        state.primary_clicked = true;
        self.push(state)
    }

    /// Returns the snapshot for the next frame.
    pub fn next_frame(&mut self) -> PointerState {
        if let Some(state) = self.steps.get(self.cursor) {
            self.cursor += 1;
            *state
        } else {
            // Exhausted: settle on the last position with all edges cleared.
            match self.steps.last() {
                Some(last) => PointerState {
                    primary_down: false,
                    primary_clicked: false,
                    double_clicked: false,
                    secondary_clicked: false,
                    ..*last
                },
                None => PointerState::default(),
            }
        }
    }
}

/// Aggregated report returned by [`FrameStats::observe`].
#[derive(Clone, Copy, Debug)]
pub struct FrameReport {
    /// Rolling average frame time in milliseconds.
    pub average_ms: f64,
    /// Slowest frame in the rolling window, in milliseconds.
    pub slowest_ms: f64,
    /// Total frames observed.
    pub total_frames: u64,
}

/// Rolling frame-time tracker with a fixed-size history.
///
/// Frame times are measured by the embedder (this crate never reads a
/// clock) and fed in as milliseconds.
#[derive(Debug)]
pub struct FrameStats<const N: usize> {
    deltas_ms: [f64; N],
    cursor: usize,
    total_frames: u64,
}

impl<const N: usize> Default for FrameStats<N> {
    fn default() -> Self {
        Self::new(16.67)
    }
}

impl<const N: usize> FrameStats<N> {
    /// Creates a tracker with `seed_delta_ms` prefilled in the ring buffer.
    #[must_use]
    pub const fn new(seed_delta_ms: f64) -> Self {
        Self {
            deltas_ms: [seed_delta_ms; N],
            cursor: 0,
            total_frames: 0,
        }
    }

    /// Observes one frame and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, delta_ms: f64) -> FrameReport {
        self.total_frames = self.total_frames.saturating_add(1);
        self.deltas_ms[self.cursor % N] = delta_ms;
        self.cursor = (self.cursor + 1) % N;

        let mut sum = 0.0;
        let mut slowest = 0.0_f64;
        for &delta in &self.deltas_ms {
            sum += delta;
            slowest = slowest.max(delta);
        }

        FrameReport {
            average_ms: sum / N as f64,
            slowest_ms: slowest,
            total_frames: self.total_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_is_deterministic() {
        let mut a = FrameDriver::new(0.25);
        let mut b = FrameDriver::new(0.25);
        for _ in 0..10 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.tick().index, 11);
        assert!((a.tick().elapsed - 3.0).abs() < 1e-6);
    }

    #[test]
    fn script_replays_then_settles() {
        let mut script = PointerScript::new();
        script
            .move_to(Point::new(10.0, 10.0))
            .press(Point::new(10.0, 10.0))
            .release(Point::new(12.0, 10.0));

        assert_eq!(script.next_frame().position, Point::new(10.0, 10.0));
        assert!(script.next_frame().primary_down);
        assert!(script.next_frame().primary_clicked);

        // Exhausted: same position, edges cleared, forever.
        let settled = script.next_frame();
        assert_eq!(settled.position, Point::new(12.0, 10.0));
        assert!(!settled.primary_clicked);
        assert_eq!(script.next_frame(), settled);
    }

    #[test]
    fn empty_script_idles_at_origin() {
        let mut script = PointerScript::new();
        assert_eq!(script.next_frame(), PointerState::default());
    }

    #[test]
    fn stats_track_average_and_slowest() {
        let mut stats = FrameStats::<4>::new(10.0);
        let report = stats.observe(30.0);
        assert_eq!(report.total_frames, 1);
        assert!((report.average_ms - 15.0).abs() < 1e-9, "30 + 3*10 over 4");
        assert!((report.slowest_ms - 30.0).abs() < 1e-9);

        for _ in 0..4 {
            let _ = stats.observe(10.0);
        }
        let report = stats.observe(10.0);
        assert!((report.average_ms - 10.0).abs() < 1e-9, "window rolled over");
        assert_eq!(report.total_frames, 6);
    }
}
