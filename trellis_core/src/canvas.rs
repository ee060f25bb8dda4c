// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas contract for rendering backends.
//!
//! The engine emits a small set of draw calls against this trait and never
//! rasterizes anything itself. Backend crates (or `trellis_render`'s
//! recording `RenderPlan`) implement it; how a rectangle or textured quad
//! actually reaches pixels is outside this crate's scope.

use kurbo::{Point, Rect};

use crate::color::Rgba;

/// An opaque reference to a texture.
///
/// Textures are created and managed externally (e.g. by an atlas or GPU
/// backend); the engine passes the handle through without interpreting it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

impl core::fmt::Debug for TextureId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

/// Receives the engine's draw calls for one frame, in back-to-front order.
pub trait Canvas {
    /// Fills a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Strokes a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64);

    /// Draws a line segment.
    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64);

    /// Draws a textured quad. `uv` selects the source region in normalized
    /// texture coordinates.
    fn textured_quad(&mut self, rect: Rect, texture: TextureId, uv: Rect, tint: Rgba);
}
