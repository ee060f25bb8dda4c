// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and geometry
//! property management.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::anchor::{Anchor, Pivot};
use crate::dirty;

use super::id::{INVALID, NodeId};
use super::traverse::{Ancestors, Children};

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node (and its subtree) is hidden.
    ///
    /// Properties can still be mutated while hidden; unhiding restores state
    /// immediately without extra work.
    pub hidden: bool,
    /// Whether the node keeps its base size when ancestors resize.
    ///
    /// Scaling and anchoring still apply; only the relative-size derivation
    /// is skipped during evaluation.
    pub fixed_size: bool,
    /// Whether layout groups skip this node when packing siblings.
    pub ignore_layout: bool,
}

/// Struct-of-arrays storage for all nodes of one UI tree.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// # Geometry model
///
/// Each node carries *local* geometry parameters (relative size, base size,
/// local scale, anchor, pivot, three offset kinds) set by callers, and
/// *computed* geometry (effective scale, world rectangle, effective hidden
/// state) written by [`evaluate`](Self::evaluate). A root node resolves its
/// anchor against the store's viewport rectangle.
///
/// Mutations mark dirty channels (see [`dirty`](crate::dirty)); nothing is
/// recomputed until the next evaluation, so several mutations in one frame
/// cost a single recalculation pass.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) relative_size: Vec<Size>,
    pub(crate) base_size: Vec<Size>,
    pub(crate) min_size: Vec<Size>,
    pub(crate) max_size: Vec<Size>,
    pub(crate) local_scale: Vec<Vec2>,
    pub(crate) anchor: Vec<Anchor>,
    pub(crate) pivot: Vec<Pivot>,
    pub(crate) relative_offset: Vec<Vec2>,
    pub(crate) absolute_offset: Vec<Vec2>,
    pub(crate) screen_offset: Vec<Vec2>,
    pub(crate) flags: Vec<NodeFlags>,

    // -- Computed properties (written by evaluate) --
    pub(crate) scale: Vec<Vec2>,
    pub(crate) world_rect: Vec<Rect>,
    pub(crate) effective_hidden: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,

    // -- Tree-wide context --
    pub(crate) viewport: Rect,
    pub(crate) ui_scale: Vec2,
}

const NO_MIN: Size = Size::ZERO;
const NO_MAX: Size = Size::new(f64::INFINITY, f64::INFINITY);

impl NodeStore {
    /// Creates an empty node store whose root nodes resolve against
    /// `viewport`.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            relative_size: Vec::new(),
            base_size: Vec::new(),
            min_size: Vec::new(),
            max_size: Vec::new(),
            local_scale: Vec::new(),
            anchor: Vec::new(),
            pivot: Vec::new(),
            relative_offset: Vec::new(),
            absolute_offset: Vec::new(),
            screen_offset: Vec::new(),
            flags: Vec::new(),
            scale: Vec::new(),
            world_rect: Vec::new(),
            effective_hidden: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            viewport,
            ui_scale: Vec2::new(1.0, 1.0),
        }
    }

    // -- Allocation API --

    /// Creates a new detached node and returns its handle.
    ///
    /// The node starts with relative size 1×1 (fills its parent), unit local
    /// scale, a top-left anchor and pivot, zero offsets, and no parent.
    pub fn create_node(&mut self) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.relative_size[idx as usize] = Size::new(1.0, 1.0);
            self.base_size[idx as usize] = Size::ZERO;
            self.min_size[idx as usize] = NO_MIN;
            self.max_size[idx as usize] = NO_MAX;
            self.local_scale[idx as usize] = Vec2::new(1.0, 1.0);
            self.anchor[idx as usize] = Anchor::TopLeft;
            self.pivot[idx as usize] = Pivot::TopLeft;
            self.relative_offset[idx as usize] = Vec2::ZERO;
            self.absolute_offset[idx as usize] = Vec2::ZERO;
            self.screen_offset[idx as usize] = Vec2::ZERO;
            self.flags[idx as usize] = NodeFlags::default();
            self.scale[idx as usize] = Vec2::new(1.0, 1.0);
            self.world_rect[idx as usize] = Rect::ZERO;
            self.effective_hidden[idx as usize] = false;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.relative_size.push(Size::new(1.0, 1.0));
            self.base_size.push(Size::ZERO);
            self.min_size.push(NO_MIN);
            self.max_size.push(NO_MAX);
            self.local_scale.push(Vec2::new(1.0, 1.0));
            self.anchor.push(Anchor::TopLeft);
            self.pivot.push(Pivot::TopLeft);
            self.relative_offset.push(Vec2::ZERO);
            self.absolute_offset.push(Vec2::ZERO);
            self.screen_offset.push(Vec2::ZERO);
            self.flags.push(NodeFlags::default());
            self.scale.push(Vec2::new(1.0, 1.0));
            self.world_rect.push(Rect::ZERO);
            self.effective_hidden.push(false);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::GEOMETRY);
        self.dirty.mark(idx, dirty::VISIBILITY);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Creates a node sized as a fraction of its parent.
    ///
    /// `parent` of `None` parents the node to the viewport. The pivot is
    /// matched to `anchor` so the node sits flush against that edge.
    pub fn create_relative(&mut self, size: Size, parent: Option<NodeId>, anchor: Anchor) -> NodeId {
        let id = self.create_node();
        self.relative_size[id.idx as usize] = size;
        self.anchor[id.idx as usize] = anchor;
        self.pivot[id.idx as usize] = anchor.matching_pivot();
        if let Some(p) = parent {
            let attached = self.add_child(p, id);
            debug_assert!(attached, "fresh node cannot form a cycle");
        }
        let parent_base = self.parent_base_size(id.idx);
        let base = self.clamped_base(id.idx, parent_base, size);
        self.base_size[id.idx as usize] = base;
        id
    }

    /// Creates a node with a base size in (pre-scale) pixels.
    ///
    /// The equivalent relative size is derived against the parent's current
    /// base rectangle, so future parent resizes scale this node
    /// proportionally. `parent` of `None` parents the node to the viewport.
    pub fn create_absolute(&mut self, size: Size, parent: Option<NodeId>, anchor: Anchor) -> NodeId {
        let id = self.create_node();
        self.anchor[id.idx as usize] = anchor;
        self.pivot[id.idx as usize] = anchor.matching_pivot();
        if let Some(p) = parent {
            let attached = self.add_child(p, id);
            debug_assert!(attached, "fresh node cannot form a cycle");
        }
        self.base_size[id.idx as usize] = size;
        self.resync_relative_size(id.idx);
        id
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// The node is detached from its parent first.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.detach(idx);
        }

        // Remove dirty tracking dependencies.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Returns `false` and performs nothing if `parent` lies inside `child`'s
    /// subtree (the attach would create a cycle).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    #[must_use = "a rejected attach leaves the child detached"]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        if p == c || self.is_in_subtree(p, c) {
            return false;
        }

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.link_dirty_edges(c, p);
        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(p, dirty::LAYOUT);
        true
    }

    /// Removes `child` from its current parent, leaving it as a root.
    ///
    /// No-op if the node has no parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        if self.parent[c as usize] == INVALID {
            return;
        }

        let p = self.parent[c as usize];
        self.detach(c);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(p, dirty::LAYOUT);
    }

    /// Moves `child` to be the last child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first. Returns `false`
    /// and performs nothing if `new_parent` lies inside `child`'s subtree
    /// (the move would create a cycle).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use = "a rejected reparent leaves the tree unchanged"]
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> bool {
        self.validate(child);
        self.validate(new_parent);
        let c = child.idx;
        let p = new_parent.idx;
        if p == c || self.is_in_subtree(p, c) {
            return false;
        }

        if self.parent[c as usize] != INVALID {
            let old_p = self.parent[c as usize];
            self.detach(c);
            self.dirty.mark(old_p, dirty::TOPOLOGY);
            self.dirty.mark(old_p, dirty::LAYOUT);
        }

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.link_dirty_edges(c, p);
        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(p, dirty::LAYOUT);
        true
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. Returns `false` and performs
    /// nothing if the insert would create a cycle.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or
    /// `sibling` has no parent.
    #[must_use = "a rejected insert leaves the child detached"]
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) -> bool {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");
        if p == c || self.is_in_subtree(p, c) {
            return false;
        }

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.link_dirty_edges(c, p);
        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(p, dirty::LAYOUT);
        true
    }

    /// Moves `child` to the end of its parent's child list, so it is drawn
    /// last among its siblings.
    ///
    /// No-op if the node has no parent or is already the last child.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_as_last_child(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        if p == INVALID || self.next_sibling[c as usize] == INVALID {
            return;
        }

        // Unlink and relink at the tail; dirty edges are unchanged because
        // the parent stays the same.
        self.detach(c);
        self.parent[c as usize] = p;
        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
        self.link_dirty_edges(c, p);

        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        self.dirty.mark(p, dirty::LAYOUT);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(NodeId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a node, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator over a node's ancestors, nearest parent first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, id.idx)
    }

    /// Returns the root nodes (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(NodeId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Tree-wide context --

    /// Returns the viewport rectangle root nodes resolve against.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Replaces the viewport rectangle, dirtying all geometry.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.mark_all_geometry_dirty();
    }

    /// Returns the uniform UI scale applied to the whole tree.
    #[must_use]
    pub fn ui_scale(&self) -> Vec2 {
        self.ui_scale
    }

    /// Replaces the uniform UI scale, dirtying all geometry.
    pub fn set_ui_scale(&mut self, scale: Vec2) {
        self.ui_scale = scale;
        self.mark_all_geometry_dirty();
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the relative size (fraction of the parent's size).
    #[must_use]
    pub fn relative_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.relative_size[id.idx as usize]
    }

    /// Returns the base (pre-scale pixel) size.
    #[must_use]
    pub fn base_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.base_size[id.idx as usize]
    }

    /// Returns the local scale.
    #[must_use]
    pub fn local_scale(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.local_scale[id.idx as usize]
    }

    /// Returns the anchor.
    #[must_use]
    pub fn anchor(&self, id: NodeId) -> Anchor {
        self.validate(id);
        self.anchor[id.idx as usize]
    }

    /// Returns the pivot.
    #[must_use]
    pub fn pivot(&self, id: NodeId) -> Pivot {
        self.validate(id);
        self.pivot[id.idx as usize]
    }

    /// Returns the relative offset (fraction of the parent's size, directed
    /// away from the anchor).
    #[must_use]
    pub fn relative_offset(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.relative_offset[id.idx as usize]
    }

    /// Returns the absolute offset (pixels, directed away from the anchor).
    #[must_use]
    pub fn absolute_offset(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.absolute_offset[id.idx as usize]
    }

    /// Returns the screen-space offset (raw pixels, anchor-independent).
    #[must_use]
    pub fn screen_offset(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.screen_offset[id.idx as usize]
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the computed world rectangle of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.world_rect[id.idx as usize]
    }

    /// Returns the computed effective scale of a node (product of ancestor
    /// local scales and the UI scale).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn scale(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.scale[id.idx as usize]
    }

    /// Returns the world point the node's anchor resolves to on its parent
    /// (or on the viewport, for roots).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn anchor_point(&self, id: NodeId) -> Point {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        let parent_world = if p == INVALID {
            self.viewport
        } else {
            self.world_rect[p as usize]
        };
        self.anchor[id.idx as usize].point_on(parent_world)
    }

    /// Returns whether the node is effectively hidden (including by an
    /// ancestor's hidden flag).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_hidden(&self, id: NodeId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as found in `FrameChanges`) rather than
    // `NodeId` handles, skipping generation validation. Only use with indices
    // that came from `FrameChanges` or `traversal_order()`.

    /// Returns the computed world rectangle at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn rect_at(&self, idx: u32) -> Rect {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.world_rect[idx as usize]
    }

    /// Returns whether the node at raw slot `idx` is effectively hidden.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_hidden_at(&self, idx: u32) -> bool {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.effective_hidden[idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Reinterprets the node's size as a fraction of the parent's size.
    ///
    /// No validation is performed; negative or zero sizes degrade to an
    /// empty rectangle at evaluation.
    pub fn set_relative_size(&mut self, id: NodeId, size: Size) {
        self.validate(id);
        self.relative_size[id.idx as usize] = size;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(id.idx, dirty::LAYOUT);
    }

    /// Sets the base (pre-scale pixel) size directly.
    ///
    /// The equivalent relative size is re-derived against the parent's
    /// current base rectangle so future parent resizes scale this node
    /// proportionally. When `resize_children` is `false`, direct children
    /// keep their current base sizes (their relative sizes are re-synced
    /// against the new rectangle); they are still re-anchored.
    pub fn set_base_size(&mut self, id: NodeId, size: Size, resize_children: bool) {
        self.validate(id);
        let idx = id.idx;
        let clamped = self.clamp_to_bounds(idx, size);
        self.base_size[idx as usize] = clamped;
        self.resync_relative_size(idx);
        if !resize_children {
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                self.resync_relative_size(child);
                child = self.next_sibling[child as usize];
            }
        }
        self.dirty.mark_with(idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(idx, dirty::LAYOUT);
    }

    /// Sets the minimum base size in pixels.
    pub fn set_min_size(&mut self, id: NodeId, size: Size) {
        self.validate(id);
        self.min_size[id.idx as usize] = size;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(id.idx, dirty::LAYOUT);
    }

    /// Returns the minimum base size in pixels.
    #[must_use]
    pub fn min_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.min_size[id.idx as usize]
    }

    /// Sets the maximum base size in pixels.
    pub fn set_max_size(&mut self, id: NodeId, size: Size) {
        self.validate(id);
        self.max_size[id.idx as usize] = size;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(id.idx, dirty::LAYOUT);
    }

    /// Sets the local scale.
    ///
    /// Scale composes multiplicatively down the chain: a node's effective
    /// scale is the product of every ancestor's local scale times the store's
    /// UI scale.
    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec2) {
        self.validate(id);
        self.local_scale[id.idx as usize] = scale;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(id.idx, dirty::LAYOUT);
    }

    /// Changes which point on the parent this node is positioned relative to.
    ///
    /// An omitted pivot is matched to the anchor's mirror point so the node
    /// sits flush against that edge. The screen-space offset is reset.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Anchor, pivot: Option<Pivot>) {
        self.validate(id);
        self.anchor[id.idx as usize] = anchor;
        self.pivot[id.idx as usize] = pivot.unwrap_or_else(|| anchor.matching_pivot());
        self.screen_offset[id.idx as usize] = Vec2::ZERO;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Changes the pivot alone, without touching the anchor or offsets.
    pub fn set_pivot(&mut self, id: NodeId, pivot: Pivot) {
        self.validate(id);
        self.pivot[id.idx as usize] = pivot;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets the offset expressed as a fraction of the parent's size,
    /// directed away from the anchor.
    pub fn set_relative_offset(&mut self, id: NodeId, offset: Vec2) {
        self.validate(id);
        self.relative_offset[id.idx as usize] = offset;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets the offset in pixels, directed away from the anchor.
    pub fn set_absolute_offset(&mut self, id: NodeId, offset: Vec2) {
        self.validate(id);
        self.absolute_offset[id.idx as usize] = offset;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets the raw screen-space offset (anchor-independent).
    pub fn set_screen_offset(&mut self, id: NodeId, offset: Vec2) {
        self.validate(id);
        self.screen_offset[id.idx as usize] = offset;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Applies a raw pixel adjustment on top of the current screen-space
    /// offset.
    ///
    /// Unlike the absolute offset, the delta is *not* normalized by anchor
    /// direction; it is meant for transient adjustments such as drag
    /// feedback.
    pub fn translate(&mut self, id: NodeId, delta: Vec2) {
        self.validate(id);
        self.screen_offset[id.idx as usize] += delta;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets or clears the hidden flag.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        self.validate(id);
        self.flags[id.idx as usize].hidden = hidden;
        self.dirty.mark_with(id.idx, dirty::VISIBILITY, &EagerPolicy);
    }

    /// Sets or clears the fixed-size flag.
    pub fn set_fixed_size(&mut self, id: NodeId, fixed: bool) {
        self.validate(id);
        self.flags[id.idx as usize].fixed_size = fixed;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets or clears the ignore-layout flag, dirtying the parent's layout
    /// inputs so an owning layout group repacks.
    pub fn set_ignore_layout(&mut self, id: NodeId, ignore: bool) {
        self.validate(id);
        if self.flags[id.idx as usize].ignore_layout == ignore {
            return;
        }
        self.flags[id.idx as usize].ignore_layout = ignore;
        let p = self.parent[id.idx as usize];
        if p != INVALID {
            self.dirty.mark(p, dirty::LAYOUT);
        }
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Returns whether `idx` lies in the subtree rooted at `root`.
    fn is_in_subtree(&self, idx: u32, root: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == root {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Removes `idx` from its parent's child list and drops the dirty
    /// dependency edges toward the old parent.
    fn detach(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;

        self.dirty.remove_dependency(idx, p, dirty::GEOMETRY);
        self.dirty.remove_dependency(idx, p, dirty::VISIBILITY);
    }

    /// Adds dirty dependency edges: child depends on parent for inherited
    /// channels.
    fn link_dirty_edges(&mut self, child: u32, parent: u32) {
        let _ = self.dirty.add_dependency(child, parent, dirty::GEOMETRY);
        let _ = self.dirty.add_dependency(child, parent, dirty::VISIBILITY);
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::VISIBILITY, &EagerPolicy);
    }

    /// Marks every root (and, via propagation, every descendant) geometry
    /// dirty. Used when tree-wide context (viewport, UI scale) changes.
    fn mark_all_geometry_dirty(&mut self) {
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dirty.mark_with(idx, dirty::GEOMETRY, &EagerPolicy);
            }
        }
    }

    /// Returns the base rectangle size the node's relative size resolves
    /// against: the parent's base size, or the viewport for roots.
    pub(crate) fn parent_base_size(&self, idx: u32) -> Size {
        let p = self.parent[idx as usize];
        if p == INVALID {
            self.viewport.size()
        } else {
            self.base_size[p as usize]
        }
    }

    /// Clamps a candidate base size to the node's min/max bounds.
    pub(crate) fn clamp_to_bounds(&self, idx: u32, size: Size) -> Size {
        let min = self.min_size[idx as usize];
        let max = self.max_size[idx as usize];
        Size::new(
            size.width.max(min.width).min(max.width),
            size.height.max(min.height).min(max.height),
        )
    }

    /// Resolves a relative size against a parent base size, clamped to the
    /// node's bounds.
    pub(crate) fn clamped_base(&self, idx: u32, parent_base: Size, relative: Size) -> Size {
        self.clamp_to_bounds(
            idx,
            Size::new(
                parent_base.width * relative.width,
                parent_base.height * relative.height,
            ),
        )
    }

    /// Re-derives the relative size from the current base size and the
    /// parent's base rectangle. Leaves the relative size untouched when the
    /// parent rectangle is degenerate.
    fn resync_relative_size(&mut self, idx: u32) {
        let parent_base = self.parent_base_size(idx);
        if parent_base.width <= 0.0 || parent_base.height <= 0.0 {
            return;
        }
        let base = self.base_size[idx as usize];
        self.relative_size[idx as usize] = Size::new(
            base.width / parent_base.width,
            base.height / parent_base.height,
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn store() -> NodeStore {
        NodeStore::new(Rect::new(0.0, 0.0, 1000.0, 800.0))
    }

    #[test]
    fn create_and_destroy() {
        let mut s = store();
        let id = s.create_node();
        assert!(s.is_alive(id));
        s.destroy_node(id);
        assert!(!s.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut s = store();
        let id1 = s.create_node();
        s.destroy_node(id1);
        let id2 = s.create_node();
        // id2 reuses the same slot but has a different generation.
        assert!(!s.is_alive(id1));
        assert!(s.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_rect() {
        let mut s = store();
        let id = s.create_node();
        s.destroy_node(id);
        let _ = s.rect(id);
    }

    #[test]
    fn add_child_and_query() {
        let mut s = store();
        let parent = s.create_node();
        let a = s.create_node();
        let b = s.create_node();

        assert!(s.add_child(parent, a));
        assert!(s.add_child(parent, b));

        assert_eq!(s.parent(a), Some(parent));
        let kids: Vec<_> = s.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn remove_from_parent_detaches() {
        let mut s = store();
        let parent = s.create_node();
        let child = s.create_node();
        assert!(s.add_child(parent, child));

        s.remove_from_parent(child);
        assert_eq!(s.parent(child), None);
        assert!(s.children(parent).next().is_none());

        // Detaching again is a no-op.
        s.remove_from_parent(child);
    }

    #[test]
    fn insert_before_orders_siblings() {
        let mut s = store();
        let parent = s.create_node();
        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();

        assert!(s.add_child(parent, a));
        assert!(s.add_child(parent, c));
        assert!(s.insert_before(b, c));

        let kids: Vec<_> = s.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
    }

    #[test]
    fn set_as_last_child_reorders() {
        let mut s = store();
        let parent = s.create_node();
        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();
        assert!(s.add_child(parent, a));
        assert!(s.add_child(parent, b));
        assert!(s.add_child(parent, c));

        s.set_as_last_child(a);
        let kids: Vec<_> = s.children(parent).collect();
        assert_eq!(kids, vec![b, c, a]);

        // Already last: no change.
        s.set_as_last_child(a);
        let kids: Vec<_> = s.children(parent).collect();
        assert_eq!(kids, vec![b, c, a]);
    }

    #[test]
    fn reparent_moves_subtree() {
        let mut s = store();
        let p1 = s.create_node();
        let p2 = s.create_node();
        let child = s.create_node();

        assert!(s.add_child(p1, child));
        assert!(s.reparent(child, p2));
        assert_eq!(s.parent(child), Some(p2));
        assert!(s.children(p1).next().is_none());
    }

    #[test]
    fn cyclic_reparent_is_rejected() {
        let mut s = store();
        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();
        assert!(s.add_child(a, b));
        assert!(s.add_child(b, c));

        // Moving an ancestor under its own descendant must be refused.
        assert!(!s.reparent(a, c));
        assert!(!s.reparent(a, b));
        assert_eq!(s.parent(a), None);
        assert_eq!(s.parent(c), Some(b));

        // Self-parenting likewise.
        assert!(!s.reparent(a, a));
    }

    #[test]
    fn cyclic_add_child_is_rejected() {
        let mut s = store();
        let a = s.create_node();
        let b = s.create_node();
        assert!(s.add_child(a, b));
        s.remove_from_parent(a);

        // `a` is detached, but `b` sits inside `a`'s subtree: attaching `a`
        // under `b` would close a loop.
        assert!(!s.add_child(b, a));
        assert_eq!(s.parent(a), None);
    }

    #[test]
    fn ancestors_walks_to_root() {
        let mut s = store();
        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();
        assert!(s.add_child(a, b));
        assert!(s.add_child(b, c));

        let chain: Vec<_> = s.ancestors(c).collect();
        assert_eq!(chain, vec![b, a]);
    }

    #[test]
    fn roots_returns_parentless_nodes() {
        let mut s = store();
        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();
        assert!(s.add_child(a, c));

        let roots = s.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut s = store();
        let parent = s.create_node();
        let child = s.create_node();
        assert!(s.add_child(parent, child));
        s.destroy_node(parent);
    }

    #[test]
    fn translate_accumulates() {
        let mut s = store();
        let id = s.create_node();
        s.translate(id, Vec2::new(3.0, 4.0));
        s.translate(id, Vec2::new(-1.0, 1.0));
        assert_eq!(s.screen_offset(id), Vec2::new(2.0, 5.0));
    }

    #[test]
    fn set_anchor_resets_screen_offset_and_matches_pivot() {
        let mut s = store();
        let id = s.create_node();
        s.translate(id, Vec2::new(5.0, 5.0));
        s.set_anchor(id, Anchor::BottomRight, None);
        assert_eq!(s.screen_offset(id), Vec2::ZERO);
        assert_eq!(s.pivot(id), Pivot::BottomRight);

        s.set_anchor(id, Anchor::TopRight, Some(Pivot::Center));
        assert_eq!(s.pivot(id), Pivot::Center);
    }

    #[test]
    fn base_size_clamps_to_bounds() {
        let mut s = store();
        let id = s.create_node();
        s.set_min_size(id, Size::new(50.0, 50.0));
        s.set_max_size(id, Size::new(100.0, 100.0));
        s.set_base_size(id, Size::new(10.0, 500.0), true);
        assert_eq!(s.base_size(id), Size::new(50.0, 100.0));
    }

    #[test]
    fn absolute_size_rederives_relative_size() {
        let mut s = store();
        let parent = s.create_absolute(Size::new(200.0, 100.0), None, Anchor::TopLeft);
        let child = s.create_absolute(Size::new(100.0, 50.0), Some(parent), Anchor::TopLeft);
        assert_eq!(s.relative_size(child), Size::new(0.5, 0.5));
    }
}
