// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input snapshot.
//!
//! The engine treats input as a pure per-frame query: the embedder polls its
//! input device once per frame and hands the scheduler a [`PointerState`].
//! Device handling itself (event pumping, capture, double-click timing) is a
//! collaborator concern.

use kurbo::{Point, Vec2};

/// The state of the pointer for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// The primary button transitioned to down this frame.
    pub primary_down: bool,
    /// The primary button is currently held.
    pub primary_held: bool,
    /// The primary button was released this frame (a click).
    pub primary_clicked: bool,
    /// A double-click completed this frame.
    pub double_clicked: bool,
    /// The secondary button was released this frame.
    pub secondary_clicked: bool,
    /// Scroll delta for this frame.
    pub scroll: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            primary_down: false,
            primary_held: false,
            primary_clicked: false,
            double_clicked: false,
            secondary_clicked: false,
            scroll: Vec2::ZERO,
        }
    }
}

impl PointerState {
    /// An idle pointer at the given position.
    #[must_use]
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}
