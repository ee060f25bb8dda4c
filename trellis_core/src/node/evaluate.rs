// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **GEOMETRY** — Drain dirty indices, then recompute each affected node
//!    in parent-before-child order: effective scale (parent scale × local
//!    scale), base size (parent base × relative size, clamped to min/max,
//!    skipped for fixed-size nodes), and the world rectangle from anchor
//!    point, pivot offset, direction-normalized offsets, and screen offset.
//! 2. **VISIBILITY** — Drain dirty indices, recompute each node's
//!    `effective_hidden` as `parent_effective_hidden || flags.hidden`.
//! 3. **LAYOUT** — Drain dirty indices (no recomputation; layout groups
//!    consume these to mark themselves for lazy repacking).
//! 4. **TOPOLOGY** — Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//!
//! Evaluation is idempotent: drained channels stay clean, so a second call
//! with no intervening mutation recomputes nothing and returns empty change
//! sets.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than
//! [`NodeId`](super::NodeId) handles so that consumers can index directly
//! into the store via the `*_at()` accessors without paying for generation
//! checks on every access.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};

use super::id::INVALID;
use super::store::NodeStore;
use crate::dirty;

/// The set of changes produced by a single [`NodeStore::evaluate`] call.
///
/// Each field contains the raw slot indices of nodes that changed in the
/// corresponding category.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Nodes whose world rectangle or effective scale was recomputed.
    pub geometry: Vec<u32>,
    /// Nodes that transitioned from visible to effectively hidden.
    pub hidden: Vec<u32>,
    /// Nodes that transitioned from effectively hidden to visible.
    pub unhidden: Vec<u32>,
    /// Nodes whose layout-group inputs changed (own size or scale, child
    /// set). Layout groups repack lazily off this list.
    pub layout: Vec<u32>,
    /// Nodes added since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.geometry.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.layout.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }
}

impl NodeStore {
    /// Evaluates the node tree, recomputing dirty geometry and visibility and
    /// returning the set of changes.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        // Rebuild traversal order if needed.
        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        // Drain GEOMETRY — collect dirty indices, then recompute in traversal
        // order so every parent is resolved before its children.
        let dirty_geometry: Vec<u32> = self
            .dirty
            .drain(dirty::GEOMETRY)
            .affected()
            .deterministic()
            .run()
            .collect();
        if !dirty_geometry.is_empty() {
            let mut pending: BTreeSet<u32> = dirty_geometry.iter().copied().collect();
            let order = core::mem::take(&mut self.traversal_order);
            for &idx in &order {
                if pending.remove(&idx) {
                    self.recompute_geometry(idx);
                }
            }
            self.traversal_order = order;
        }
        changes.geometry = dirty_geometry;

        // Drain VISIBILITY — same ordering argument as geometry.
        let dirty_visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        if !dirty_visibility.is_empty() {
            let mut pending: BTreeSet<u32> = dirty_visibility.iter().copied().collect();
            let order = core::mem::take(&mut self.traversal_order);
            for &idx in &order {
                if !pending.remove(&idx) {
                    continue;
                }
                let parent_idx = self.parent[idx as usize];
                let parent_hidden = if parent_idx != INVALID {
                    self.effective_hidden[parent_idx as usize]
                } else {
                    false
                };
                let new_hidden = parent_hidden || self.flags[idx as usize].hidden;
                let old_hidden = self.effective_hidden[idx as usize];
                if new_hidden != old_hidden {
                    if new_hidden {
                        changes.hidden.push(idx);
                    } else {
                        changes.unhidden.push(idx);
                    }
                    self.effective_hidden[idx as usize] = new_hidden;
                }
            }
            self.traversal_order = order;
        }

        // Drain LAYOUT — no recomputation, just collect for layout groups.
        changes.layout = self
            .dirty
            .drain(dirty::LAYOUT)
            .deterministic()
            .run()
            .collect();

        // Drain TOPOLOGY (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Recomputes one node's derived geometry from its local properties and
    /// its parent's (already current) computed geometry.
    fn recompute_geometry(&mut self, idx: u32) {
        let parent_idx = self.parent[idx as usize];
        let (parent_base, parent_world, parent_scale) = if parent_idx == INVALID {
            (self.viewport.size(), self.viewport, self.ui_scale)
        } else {
            (
                self.base_size[parent_idx as usize],
                self.world_rect[parent_idx as usize],
                self.scale[parent_idx as usize],
            )
        };

        if !self.flags[idx as usize].fixed_size {
            let base = self.clamped_base(idx, parent_base, self.relative_size[idx as usize]);
            self.base_size[idx as usize] = base;
        }

        let local = self.local_scale[idx as usize];
        let scale = Vec2::new(parent_scale.x * local.x, parent_scale.y * local.y);
        self.scale[idx as usize] = scale;

        // Negative or zero sizes degrade to an empty rectangle.
        let base = self.base_size[idx as usize];
        let scaled = Size::new(
            (base.width * scale.x).max(0.0),
            (base.height * scale.y).max(0.0),
        );

        let anchor = self.anchor[idx as usize];
        let anchor_point = anchor.point_on(parent_world);
        let pivot_offset = self.pivot[idx as usize].offset_for(scaled);
        let absolute_offset = anchor.direct(self.absolute_offset[idx as usize]);
        let rel = self.relative_offset[idx as usize];
        let relative_offset = anchor.direct(Vec2::new(
            parent_world.width() * rel.x,
            parent_world.height() * rel.y,
        ));

        let top_left = anchor_point
            + pivot_offset
            + absolute_offset
            + relative_offset
            + self.screen_offset[idx as usize];
        self.world_rect[idx as usize] = Rect::from_origin_size(top_left, scaled);
    }

    /// Rebuilds the depth-first pre-order traversal of all live nodes.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
