// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor and pivot resolution.
//!
//! Positioning is expressed against nine symbolic points: the four corners,
//! the four edge midpoints, and the center of a rectangle. An [`Anchor`]
//! selects one of these points on the *parent* rectangle; a [`Pivot`] selects
//! the corresponding point on the node's *own* rectangle. A node is placed so
//! that its pivot point lands on its anchor point, before offsets are applied.
//!
//! Both resolutions are pure functions of the enum and a rectangle (or size),
//! so they are kept here as a small math module with no tree dependencies.

use kurbo::{Point, Rect, Size, Vec2};

/// One of the nine symbolic positions on the parent rectangle that a node is
/// positioned relative to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Midpoint of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Midpoint of the left edge.
    CenterLeft,
    /// Center of the rectangle.
    Center,
    /// Midpoint of the right edge.
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Midpoint of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

/// One of the nine symbolic positions on a node's own rectangle that is
/// aligned onto the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pivot {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Midpoint of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Midpoint of the left edge.
    CenterLeft,
    /// Center of the rectangle.
    Center,
    /// Midpoint of the right edge.
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Midpoint of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// Resolves this anchor to a point on the given rectangle.
    #[must_use]
    pub fn point_on(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            Self::TopLeft => Point::new(rect.x0, rect.y0),
            Self::TopCenter => Point::new(center.x, rect.y0),
            Self::TopRight => Point::new(rect.x1, rect.y0),
            Self::CenterLeft => Point::new(rect.x0, center.y),
            Self::Center => center,
            Self::CenterRight => Point::new(rect.x1, center.y),
            Self::BottomLeft => Point::new(rect.x0, rect.y1),
            Self::BottomCenter => Point::new(center.x, rect.y1),
            Self::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    /// Normalizes an offset so that positive components always push away from
    /// this anchor rather than in a fixed screen direction.
    ///
    /// An offset on a bottom-right anchored node moves it up and left; the
    /// same offset on a top-left anchored node moves it down and right.
    #[must_use]
    pub const fn direct(self, offset: Vec2) -> Vec2 {
        match self {
            Self::BottomRight => Vec2::new(-offset.x, -offset.y),
            Self::BottomLeft | Self::BottomCenter => Vec2::new(offset.x, -offset.y),
            Self::TopRight | Self::CenterRight => Vec2::new(-offset.x, offset.y),
            _ => offset,
        }
    }

    /// Returns the pivot that mirrors this anchor, so that the node sits
    /// flush against the anchored edge or corner.
    #[must_use]
    pub const fn matching_pivot(self) -> Pivot {
        match self {
            Self::TopLeft => Pivot::TopLeft,
            Self::TopCenter => Pivot::TopCenter,
            Self::TopRight => Pivot::TopRight,
            Self::CenterLeft => Pivot::CenterLeft,
            Self::Center => Pivot::Center,
            Self::CenterRight => Pivot::CenterRight,
            Self::BottomLeft => Pivot::BottomLeft,
            Self::BottomCenter => Pivot::BottomCenter,
            Self::BottomRight => Pivot::BottomRight,
        }
    }
}

impl Pivot {
    /// Returns the pixel vector from the anchor point to the node's top-left
    /// corner, for a node of the given (scaled) size.
    ///
    /// A `Center` pivot offsets by exactly half the size in both axes.
    #[must_use]
    pub const fn offset_for(self, size: Size) -> Vec2 {
        let (w, h) = (size.width, size.height);
        match self {
            Self::TopLeft => Vec2::ZERO,
            Self::TopCenter => Vec2::new(-w / 2.0, 0.0),
            Self::TopRight => Vec2::new(-w, 0.0),
            Self::CenterLeft => Vec2::new(0.0, -h / 2.0),
            Self::Center => Vec2::new(-w / 2.0, -h / 2.0),
            Self::CenterRight => Vec2::new(-w, -h / 2.0),
            Self::BottomLeft => Vec2::new(0.0, -h),
            Self::BottomCenter => Vec2::new(-w / 2.0, -h),
            Self::BottomRight => Vec2::new(-w, -h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: Rect = Rect::new(100.0, 200.0, 300.0, 600.0);

    #[test]
    fn anchor_points_cover_corners_edges_and_center() {
        assert_eq!(Anchor::TopLeft.point_on(PARENT), Point::new(100.0, 200.0));
        assert_eq!(Anchor::TopCenter.point_on(PARENT), Point::new(200.0, 200.0));
        assert_eq!(Anchor::TopRight.point_on(PARENT), Point::new(300.0, 200.0));
        assert_eq!(
            Anchor::CenterLeft.point_on(PARENT),
            Point::new(100.0, 400.0)
        );
        assert_eq!(Anchor::Center.point_on(PARENT), Point::new(200.0, 400.0));
        assert_eq!(
            Anchor::CenterRight.point_on(PARENT),
            Point::new(300.0, 400.0)
        );
        assert_eq!(
            Anchor::BottomLeft.point_on(PARENT),
            Point::new(100.0, 600.0)
        );
        assert_eq!(
            Anchor::BottomCenter.point_on(PARENT),
            Point::new(200.0, 600.0)
        );
        assert_eq!(
            Anchor::BottomRight.point_on(PARENT),
            Point::new(300.0, 600.0)
        );
    }

    #[test]
    fn pivot_offsets_are_negative_size_fractions() {
        let size = Size::new(40.0, 60.0);
        assert_eq!(Pivot::TopLeft.offset_for(size), Vec2::ZERO);
        assert_eq!(Pivot::TopCenter.offset_for(size), Vec2::new(-20.0, 0.0));
        assert_eq!(Pivot::TopRight.offset_for(size), Vec2::new(-40.0, 0.0));
        assert_eq!(Pivot::CenterLeft.offset_for(size), Vec2::new(0.0, -30.0));
        assert_eq!(Pivot::Center.offset_for(size), Vec2::new(-20.0, -30.0));
        assert_eq!(Pivot::CenterRight.offset_for(size), Vec2::new(-40.0, -30.0));
        assert_eq!(Pivot::BottomLeft.offset_for(size), Vec2::new(0.0, -60.0));
        assert_eq!(
            Pivot::BottomCenter.offset_for(size),
            Vec2::new(-20.0, -60.0)
        );
        assert_eq!(Pivot::BottomRight.offset_for(size), Vec2::new(-40.0, -60.0));
    }

    #[test]
    fn anchored_pivot_lands_on_the_anchor_point() {
        // For every matched anchor/pivot pair, anchor point + pivot offset
        // must place the node inside the parent, flush against the anchored
        // edge or corner.
        let size = Size::new(50.0, 20.0);
        for anchor in [
            Anchor::TopLeft,
            Anchor::TopCenter,
            Anchor::TopRight,
            Anchor::CenterLeft,
            Anchor::Center,
            Anchor::CenterRight,
            Anchor::BottomLeft,
            Anchor::BottomCenter,
            Anchor::BottomRight,
        ] {
            let top_left = anchor.point_on(PARENT) + anchor.matching_pivot().offset_for(size);
            let rect = Rect::from_origin_size(top_left, size);
            assert!(
                rect.x0 >= PARENT.x0
                    && rect.y0 >= PARENT.y0
                    && rect.x1 <= PARENT.x1
                    && rect.y1 <= PARENT.y1,
                "{anchor:?}: {rect:?} escapes parent"
            );
        }
    }

    #[test]
    fn mixed_anchor_and_pivot() {
        // Anchored bottom-right, pivoted at center: the node's center sits on
        // the parent's bottom-right corner.
        let size = Size::new(10.0, 10.0);
        let top_left =
            Anchor::BottomRight.point_on(PARENT) + Pivot::Center.offset_for(size);
        assert_eq!(top_left, Point::new(295.0, 595.0));
    }

    #[test]
    fn offset_direction_is_away_from_the_anchor() {
        let offset = Vec2::new(10.0, 10.0);
        assert_eq!(Anchor::TopLeft.direct(offset), Vec2::new(10.0, 10.0));
        assert_eq!(Anchor::TopCenter.direct(offset), Vec2::new(10.0, 10.0));
        assert_eq!(Anchor::TopRight.direct(offset), Vec2::new(-10.0, 10.0));
        assert_eq!(Anchor::CenterLeft.direct(offset), Vec2::new(10.0, 10.0));
        assert_eq!(Anchor::Center.direct(offset), Vec2::new(10.0, 10.0));
        assert_eq!(Anchor::CenterRight.direct(offset), Vec2::new(-10.0, 10.0));
        assert_eq!(Anchor::BottomLeft.direct(offset), Vec2::new(10.0, -10.0));
        assert_eq!(Anchor::BottomCenter.direct(offset), Vec2::new(10.0, -10.0));
        assert_eq!(Anchor::BottomRight.direct(offset), Vec2::new(-10.0, -10.0));
    }

    #[test]
    fn matching_pivot_mirrors_every_anchor() {
        assert_eq!(Anchor::TopRight.matching_pivot(), Pivot::TopRight);
        assert_eq!(Anchor::Center.matching_pivot(), Pivot::Center);
        assert_eq!(Anchor::BottomCenter.matching_pivot(), Pivot::BottomCenter);
    }
}
