// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one frame.

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use trellis_core::canvas::{Canvas, TextureId};
use trellis_core::color::Rgba;

/// A single draw command in the render plan.
///
/// Items are produced in back-to-front order, matching the scheduler's draw
/// order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawItem {
    /// A filled rectangle.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Rgba,
    },
    /// A rectangle outline.
    StrokeRect {
        /// Target rectangle.
        rect: Rect,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f64,
    },
    /// A line segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f64,
    },
    /// A textured quad.
    TexturedQuad {
        /// Target rectangle.
        rect: Rect,
        /// Source texture.
        texture: TextureId,
        /// Source region in normalized texture coordinates.
        uv: Rect,
        /// Tint color.
        tint: Rgba,
    },
}

/// An ordered list of draw commands for a single frame.
///
/// Implements [`Canvas`], so the engine's draw pass records directly into
/// the plan; backends then translate the items into native draw calls.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Draw items in back-to-front order.
    pub items: Vec<DrawItem>,
}

impl RenderPlan {
    /// Creates an empty render plan.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of recorded items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the plan is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Canvas for RenderPlan {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.items.push(DrawItem::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64) {
        self.items.push(DrawItem::StrokeRect { rect, color, width });
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.items.push(DrawItem::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn textured_quad(&mut self, rect: Rect, texture: TextureId, uv: Rect, tint: Rgba) {
        self.items.push(DrawItem::TexturedQuad {
            rect,
            texture,
            uv,
            tint,
        });
    }
}
