// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-axis layout groups.
//!
//! A [`LayoutGroup`] arranges the children of one node along an axis,
//! optionally stretching them to fill the group's extent. Recalculation is
//! lazy: mutations only set a dirty flag, and the packing itself runs on the
//! next [`update`](LayoutGroup::update) call, so several mutations in one
//! frame cost a single repack.
//!
//! Dirtiness arrives two ways: explicitly via
//! [`mark_dirty`](LayoutGroup::mark_dirty) (for collaborators that mutate
//! children outside the normal attach/detach path), or by absorbing the
//! layout-input change set of an evaluation via
//! [`absorb_changes`](LayoutGroup::absorb_changes) — the store marks a node's
//! layout inputs when its child set, size, or scale changes.
//!
//! Packed positions are written as anchor-directed absolute offsets, so a
//! bottom-anchored group packs upward without any special casing.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::anchor::Anchor;
use crate::node::{FrameChanges, NodeId, NodeStore};

/// The axis a [`LayoutGroup`] packs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Pack left-to-right (or away from a right-side child anchor).
    Horizontal,
    /// Pack top-to-bottom (or away from a bottom-side child anchor).
    Vertical,
}

impl Axis {
    fn of_size(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }
}

/// Arranges the children of one node along an axis.
#[derive(Debug)]
pub struct LayoutGroup {
    node: NodeId,
    axis: Axis,
    stretch: bool,
    absolute_spacing: f64,
    relative_spacing: f64,
    child_anchor: Anchor,
    needs_recalculate: bool,
}

impl LayoutGroup {
    /// Creates a layout group over the children of `node`.
    ///
    /// Starts dirty, so the first [`update`](Self::update) packs immediately.
    #[must_use]
    pub fn new(node: NodeId, axis: Axis) -> Self {
        Self {
            node,
            axis,
            stretch: false,
            absolute_spacing: 0.0,
            relative_spacing: 0.0,
            child_anchor: Anchor::TopLeft,
            needs_recalculate: true,
        }
    }

    /// Returns the node whose children this group arranges.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Enables or disables stretch-to-fill.
    pub fn set_stretch(&mut self, stretch: bool) {
        self.stretch = stretch;
        self.needs_recalculate = true;
    }

    /// Sets the gap between consecutive children: `absolute` pixels plus
    /// `relative` as a fraction of the group's own extent.
    pub fn set_spacing(&mut self, absolute: f64, relative: f64) {
        self.absolute_spacing = absolute;
        self.relative_spacing = relative;
        self.needs_recalculate = true;
    }

    /// Sets the corner or edge children are packed away from.
    pub fn set_child_anchor(&mut self, anchor: Anchor) {
        self.child_anchor = anchor;
        self.needs_recalculate = true;
    }

    /// Flags the group for recalculation on the next update tick.
    pub fn mark_dirty(&mut self) {
        self.needs_recalculate = true;
    }

    /// Returns whether the group will repack on the next update.
    #[must_use]
    pub fn needs_recalculate(&self) -> bool {
        self.needs_recalculate
    }

    /// Marks the group dirty if the evaluation's layout-input change set
    /// names its node (child added/removed, own size or scale changed).
    pub fn absorb_changes(&mut self, changes: &FrameChanges) {
        if changes.layout.contains(&self.node.index()) {
            self.needs_recalculate = true;
        }
    }

    /// Repacks the children if the group is dirty; otherwise does nothing.
    ///
    /// Reads current child rectangles, so call after an evaluation. The
    /// offsets written here take effect at the *next* evaluation, per the
    /// frame model.
    pub fn update(&mut self, nodes: &mut NodeStore) {
        if !self.needs_recalculate {
            return;
        }
        self.needs_recalculate = false;

        if !nodes.is_alive(self.node) {
            return;
        }

        let extent = self.axis.of_size(nodes.rect(self.node).size());
        let children: Vec<NodeId> = nodes
            .children(self.node)
            .filter(|&c| !nodes.flags(c).ignore_layout)
            .collect();
        if children.is_empty() {
            return;
        }

        let spacing = self.absolute_spacing + self.relative_spacing * extent;

        let mut factor = 1.0;
        if self.stretch {
            let sum_min: f64 = children
                .iter()
                .map(|&c| self.axis.of_size(nodes.min_size(c)))
                .sum();
            let sum_current: f64 = children
                .iter()
                .map(|&c| self.axis.of_size(nodes.rect(c).size()) + spacing)
                .sum();
            let denominator = sum_current - sum_min;
            // The factor stays 1.0 when the group is no larger than the
            // summed minimums, or when either extent is degenerate.
            if extent > sum_min && denominator > 0.0 {
                factor = (extent - sum_min) / denominator;
            }
            if factor != 1.0 {
                for &c in &children {
                    let rel = nodes.relative_size(c);
                    let stretched = match self.axis {
                        Axis::Horizontal => Size::new(rel.width * factor, rel.height),
                        Axis::Vertical => Size::new(rel.width, rel.height * factor),
                    };
                    nodes.set_relative_size(c, stretched);
                }
            }
        }

        // Pack back-to-back from the child anchor. The absolute offset is
        // anchor-directed, so a positive running position always moves away
        // from the packing corner.
        let mut position = 0.0;
        for &c in &children {
            nodes.set_anchor(c, self.child_anchor, None);
            let cross = nodes.absolute_offset(c);
            let offset = match self.axis {
                Axis::Horizontal => Vec2::new(position, cross.y),
                Axis::Vertical => Vec2::new(cross.x, position),
            };
            nodes.set_absolute_offset(c, offset);

            let child_extent = self.axis.of_size(nodes.rect(c).size()) * factor;
            position += child_extent + spacing;
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::*;

    fn store() -> NodeStore {
        NodeStore::new(Rect::new(0.0, 0.0, 1000.0, 800.0))
    }

    #[test]
    fn packs_children_back_to_back_with_spacing() {
        let mut s = store();
        let group = s.create_absolute(Size::new(300.0, 100.0), None, Anchor::TopLeft);
        let a = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let b = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let c = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Horizontal);
        layout.set_spacing(5.0, 0.0);
        layout.update(&mut s);
        let _ = s.evaluate();

        assert_eq!(s.rect(a).origin(), Point::new(0.0, 0.0));
        assert_eq!(s.rect(b).origin(), Point::new(35.0, 0.0));
        assert_eq!(s.rect(c).origin(), Point::new(70.0, 0.0));
    }

    #[test]
    fn stretch_fills_the_group_exactly() {
        let mut s = store();
        let group = s.create_absolute(Size::new(300.0, 100.0), None, Anchor::TopLeft);
        let kids = [
            s.create_absolute(Size::new(50.0, 100.0), Some(group), Anchor::TopLeft),
            s.create_absolute(Size::new(50.0, 100.0), Some(group), Anchor::TopLeft),
            s.create_absolute(Size::new(50.0, 100.0), Some(group), Anchor::TopLeft),
        ];
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Horizontal);
        layout.set_stretch(true);
        layout.update(&mut s);
        let _ = s.evaluate();

        let total: f64 = kids.iter().map(|&k| s.rect(k).width()).sum();
        assert!(
            (total - 300.0).abs() < 1.0,
            "stretched children must fill the group (got {total})"
        );
        // Children stay packed without overlap.
        assert_eq!(s.rect(kids[0]).origin().x, 0.0);
        assert!((s.rect(kids[1]).origin().x - 100.0).abs() < 1.0);
        assert!((s.rect(kids[2]).origin().x - 200.0).abs() < 1.0);
    }

    #[test]
    fn stretch_clamps_when_group_is_smaller_than_minimums() {
        let mut s = store();
        let group = s.create_absolute(Size::new(50.0, 100.0), None, Anchor::TopLeft);
        let a = s.create_absolute(Size::new(40.0, 100.0), Some(group), Anchor::TopLeft);
        let b = s.create_absolute(Size::new(40.0, 100.0), Some(group), Anchor::TopLeft);
        s.set_min_size(a, Size::new(40.0, 0.0));
        s.set_min_size(b, Size::new(40.0, 0.0));
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Horizontal);
        layout.set_stretch(true);
        layout.update(&mut s);
        let _ = s.evaluate();

        // Factor 1.0: sizes untouched.
        assert_eq!(s.rect(a).width(), 40.0);
        assert_eq!(s.rect(b).width(), 40.0);
    }

    #[test]
    fn degenerate_group_does_not_divide_by_zero() {
        let mut s = store();
        let group = s.create_absolute(Size::ZERO, None, Anchor::TopLeft);
        let a = s.create_relative(Size::new(1.0, 0.5), Some(group), Anchor::TopLeft);
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Vertical);
        layout.set_stretch(true);
        layout.update(&mut s);

        // Factor stays 1.0: the child's relative size is untouched.
        assert_eq!(s.relative_size(a), Size::new(1.0, 0.5));
    }

    #[test]
    fn zero_children_is_a_no_op() {
        let mut s = store();
        let group = s.create_absolute(Size::new(100.0, 100.0), None, Anchor::TopLeft);
        let _ = s.evaluate();
        let mut layout = LayoutGroup::new(group, Axis::Vertical);
        layout.update(&mut s);
        assert!(!layout.needs_recalculate());
    }

    #[test]
    fn ignored_children_are_skipped_entirely() {
        let mut s = store();
        let group = s.create_absolute(Size::new(300.0, 100.0), None, Anchor::TopLeft);
        let a = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let skipped = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let b = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        s.set_ignore_layout(skipped, true);
        s.set_absolute_offset(skipped, Vec2::new(250.0, 0.0));
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Horizontal);
        layout.update(&mut s);
        let _ = s.evaluate();

        // `b` packs directly after `a`; the ignored node keeps its offset.
        assert_eq!(s.rect(a).origin().x, 0.0);
        assert_eq!(s.rect(b).origin().x, 30.0);
        assert_eq!(s.rect(skipped).origin().x, 250.0);
    }

    #[test]
    fn recalculation_is_lazy() {
        let mut s = store();
        let group = s.create_absolute(Size::new(300.0, 100.0), None, Anchor::TopLeft);
        let a = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Horizontal);
        layout.update(&mut s);
        let _ = s.evaluate();

        // A clean group leaves manual adjustments alone.
        s.set_absolute_offset(a, Vec2::new(123.0, 0.0));
        let _ = s.evaluate();
        layout.update(&mut s);
        let _ = s.evaluate();
        assert_eq!(s.rect(a).origin().x, 123.0);

        // Marking dirty repacks on the next update.
        layout.mark_dirty();
        layout.update(&mut s);
        let _ = s.evaluate();
        assert_eq!(s.rect(a).origin().x, 0.0);
    }

    #[test]
    fn absorbs_layout_changes_from_evaluation() {
        let mut s = store();
        let group = s.create_absolute(Size::new(300.0, 100.0), None, Anchor::TopLeft);
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Horizontal);
        layout.update(&mut s);
        assert!(!layout.needs_recalculate());

        // Adding a child dirties the group's layout inputs.
        let _a = s.create_absolute(Size::new(30.0, 100.0), Some(group), Anchor::TopLeft);
        let changes = s.evaluate();
        layout.absorb_changes(&changes);
        assert!(layout.needs_recalculate());
    }

    #[test]
    fn bottom_anchored_group_packs_upward() {
        let mut s = store();
        let group = s.create_absolute(Size::new(100.0, 300.0), None, Anchor::TopLeft);
        let a = s.create_absolute(Size::new(100.0, 40.0), Some(group), Anchor::TopLeft);
        let b = s.create_absolute(Size::new(100.0, 40.0), Some(group), Anchor::TopLeft);
        let _ = s.evaluate();

        let mut layout = LayoutGroup::new(group, Axis::Vertical);
        layout.set_child_anchor(Anchor::BottomLeft);
        layout.update(&mut s);
        let _ = s.evaluate();

        // First child flush against the bottom edge, second stacked above it.
        assert_eq!(s.rect(a).y1, 300.0);
        assert_eq!(s.rect(b).y1, 260.0);
    }
}
