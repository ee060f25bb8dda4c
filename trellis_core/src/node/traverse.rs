// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::NodeStore;

/// An iterator over the direct children of a node, in sibling order.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

/// An iterator over a node's ancestors, nearest parent first.
///
/// Created by [`NodeStore::ancestors`]. Does not yield the starting node.
#[derive(Debug)]
pub struct Ancestors<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(store: &'a NodeStore, start: u32) -> Self {
        Self {
            store,
            current: store.parent[start as usize],
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.parent[idx as usize];
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}
