// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Trellis uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! propagate invalidation through the node tree. Each channel represents an
//! independent category of change.
//!
//! # Propagation semantics
//!
//! Channels differ in whether dirtiness propagates to descendants:
//!
//! - **Propagating** — [`GEOMETRY`] and [`VISIBILITY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency edges
//!   from child to parent. Marking a parent dirty automatically marks all
//!   descendants, because world rectangles, effective scales, and effective
//!   hidden state are inherited properties.
//!
//! - **Local-only** — [`LAYOUT`] is marked with the default policy. Only the
//!   explicitly marked node appears in the drain output: it flags a node
//!   whose layout-group inputs (own size or scale, child set) changed, and a
//!   group recalculates only its own children.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on topology mutations
//!   (add/remove child, create/destroy node, reorder). It triggers a
//!   traversal-order rebuild during evaluation but does not propagate to
//!   descendants.
//!
//! # Consumption
//!
//! Callers never need to query dirty state directly. Each
//! [`NodeStore::evaluate`](crate::node::NodeStore::evaluate) call drains all
//! channels and surfaces the results as
//! [`FrameChanges`](crate::node::FrameChanges).

use understory_dirty::Channel;

/// Geometry input changed (size, scale, anchor, pivot, offsets, viewport) —
/// requires world-rectangle and effective-scale recomputation for descendants.
pub const GEOMETRY: Channel = Channel::new(0);

/// Hidden flag changed — requires effective-hidden recomputation for
/// descendants.
pub const VISIBILITY: Channel = Channel::new(1);

/// Layout-group inputs changed (own size/scale or child set) — no propagation
/// needed; consumed by [`LayoutGroup`](crate::layout::LayoutGroup).
pub const LAYOUT: Channel = Channel::new(2);

/// Tree topology changed — triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(3);
