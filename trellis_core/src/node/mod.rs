// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform-node tree data model.
//!
//! A *node* is one element in the UI layout tree. Each node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree. Sibling order is draw/update/layout order and is explicit:
//!   [`insert_before`](NodeStore::insert_before) and
//!   [`set_as_last_child`](NodeStore::set_as_last_child) reorder it.
//! - **Local geometry** set by the caller: relative size, base (pre-scale
//!   pixel) size with optional min/max bounds, local scale, anchor, pivot,
//!   and the three offset kinds (relative, absolute, screen-space).
//! - **Computed geometry** produced by [`evaluate`](NodeStore::evaluate):
//!   the effective scale (product of ancestor local scales and the UI
//!   scale), the world rectangle, and the effective hidden state.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles for
//! cache-friendly traversal.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **GEOMETRY** / **VISIBILITY** — propagate to all descendants, since
//!   world rectangles, effective scales, and effective hidden state are
//!   inherited.
//! - **LAYOUT** — local-only; flags a node whose layout-group inputs
//!   changed.
//! - **TOPOLOGY** — structural changes that trigger a traversal-order
//!   rebuild.

mod evaluate;
mod id;
mod store;
mod traverse;

pub use evaluate::FrameChanges;
pub use id::{INVALID, NodeId};
pub use store::{NodeFlags, NodeStore};
pub use traverse::{Ancestors, Children};
