// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and style-sheet loading for trellis diagnostics.
//!
//! This crate provides the `std`-side tooling around `trellis_core`:
//!
//! - [`pretty::PrettySink`] — a
//!   [`TraceSink`](trellis_core::trace::TraceSink) with human-readable
//!   one-line-per-event output, for development frame loops.
//! - [`stylesheet::parse_stylesheet`] — loads a
//!   [`StyleSheet`](trellis_core::style::StyleSheet) from a JSON document,
//!   degrading malformed entries to the neutral style with warnings instead
//!   of failing the load.

pub mod pretty;
pub mod stylesheet;
