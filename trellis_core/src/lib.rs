// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored layout tree and component scheduling for retained-mode UI.
//!
//! `trellis_core` provides the foundational data structures for a
//! frame-stepped UI: a hierarchical anchor/pivot transform tree, a component
//! layer with interaction state and timed effects, and a scheduler that
//! drives ordered update/draw dispatch and pointer-focus resolution. It is
//! `no_std` compatible (with `alloc`) and uses array-based struct-of-arrays
//! storage with index handles for cache-friendly traversal.
//!
//! # Architecture
//!
//! The crate is organized around a frame loop that turns caller mutations
//! into incremental recomputation:
//!
//! ```text
//!   mutations ──► dirty channels
//!                     │
//!                     ▼
//!   NodeStore::evaluate() ──► FrameChanges ──► LayoutGroup::update()
//!                                   │
//!                                   ▼
//!   UiScheduler::refresh() ──► resolve_pointer_focus()
//!                                   │
//!                                   ▼
//!   UiScheduler::update(dt) ──► UiScheduler::draw() ──► Canvas
//! ```
//!
//! **[`node`]** — Struct-of-arrays node tree with generational handles.
//! Geometry parameters (sizes, scale, anchor, pivot, offsets) are set by the
//! caller; world rectangles and effective scales are computed by evaluation.
//!
//! **[`anchor`]** — The nine-way anchor/pivot model and offset direction
//! normalization, as pure functions.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! GEOMETRY and VISIBILITY propagate to descendants; LAYOUT is local-only;
//! TOPOLOGY triggers a traversal rebuild.
//!
//! **[`layout`]** — Lazily recalculated single-axis layout groups with
//! optional stretch-to-fill.
//!
//! **[`widget`]** — Component records (visibility, interaction state,
//! per-state colors, dispatch flags) bound one-to-one to nodes, with an
//! optional [`Behavior`](widget::Behavior) hook for concrete widgets.
//!
//! **[`effect`]** — Flash/fade/pulsate as explicit delta-time state records.
//!
//! **[`scheduler`]** — The per-frame ordered dispatch list with staged
//! insertion/removal and topmost-wins pointer focus.
//!
//! **[`style`]** — Immutable style records with a neutral fallback.
//!
//! **[`input`]** / **[`canvas`]** — The pointer-snapshot and draw-call
//! contracts toward collaborators.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop diagnostics, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

// Re-exported for downstream crates, so geometry types always match.
pub use kurbo;

pub mod anchor;
pub mod canvas;
pub mod color;
pub mod dirty;
pub mod effect;
pub mod input;
pub mod layout;
pub mod node;
pub mod scheduler;
pub mod style;
pub mod trace;
pub mod widget;
