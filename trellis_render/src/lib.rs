// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-list definitions for trellis.
//!
//! This crate provides the intermediate representation between
//! `trellis_core`'s draw pass and backend-specific rendering. It defines:
//!
//! - [`DrawItem`] — a single draw command
//! - [`RenderPlan`] — an ordered list of draw commands for one frame,
//!   implementing [`Canvas`](trellis_core::canvas::Canvas) so the engine can
//!   record directly into it

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod plan;

pub use plan::{DrawItem, RenderPlan};
