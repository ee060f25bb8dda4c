// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame component scheduler.
//!
//! [`UiScheduler`] owns the single ordered list that drives update/draw
//! dispatch for one UI tree, and resolves pointer focus against it. It is an
//! explicit context object: create one per UI session (or per test) and drop
//! it with the session — there is no process-global state.
//!
//! # The live list and the queues
//!
//! The live list is mutated only between frames, through staging queues:
//! registration enqueues, and [`refresh`](UiScheduler::refresh) applies
//! everything in one place. Update and draw passes iterate the live list
//! without ever mutating it, so no traversal can observe a half-applied
//! mutation.
//!
//! Components with update order `0` append in registration order. Negative
//! orders stage into a "before" list and positive orders into an "after"
//! list; both merge by update order during the refresh, keeping registration
//! order among equals.
//!
//! The removal queue is drained *last*: a component enqueued for both
//! addition and removal within the same frame is not on the live list after
//! the refresh.
//!
//! # Pointer focus
//!
//! [`resolve_pointer_focus`](UiScheduler::resolve_pointer_focus) scans the
//! live list in reverse, so visually overlapping components resolve to
//! whichever was drawn last (on top). While the primary button is held the
//! previous focus is kept, so dragging does not slide focus onto whatever
//! the pointer crosses.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::canvas::Canvas;
use crate::input::PointerState;
use crate::node::NodeStore;
use crate::trace::{
    FocusChangeEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, RefreshSummary, Tracer,
    UsageErrorEvent, UsageErrorKind,
};
use crate::widget::{ComponentId, ComponentStore};

/// Owns the ordered update/draw list and pointer focus for one UI tree.
#[derive(Debug, Default)]
pub struct UiScheduler {
    live: Vec<ComponentId>,
    live_set: BTreeSet<ComponentId>,
    additions: VecDeque<ComponentId>,
    removals: VecDeque<ComponentId>,
    before: Vec<ComponentId>,
    after: Vec<ComponentId>,
    focus: Option<ComponentId>,
    pending_errors: Vec<UsageErrorEvent>,
    frame_index: u64,
}

impl UiScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live list in update/draw order.
    #[must_use]
    pub fn live(&self) -> &[ComponentId] {
        &self.live
    }

    /// Returns the component that currently has pointer focus, if any.
    #[must_use]
    pub fn pointer_focus(&self) -> Option<ComponentId> {
        self.focus
    }

    /// Returns the frame counter, incremented by each refresh.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Stages a component for insertion at the next refresh.
    ///
    /// Stale, invisible, or already-live components are rejected: the call
    /// becomes a no-op reported through the diagnostic channel, so one broken
    /// registration cannot stop the frame.
    pub fn enqueue_add(&mut self, components: &ComponentStore, id: ComponentId) {
        if !components.is_alive(id) {
            self.pending_errors.push(UsageErrorEvent {
                kind: UsageErrorKind::AddStale,
                component_index: id.index(),
            });
            return;
        }
        if !components.get(id).visible {
            self.pending_errors.push(UsageErrorEvent {
                kind: UsageErrorKind::AddInvisible,
                component_index: id.index(),
            });
            return;
        }
        if self.live_set.contains(&id) {
            self.pending_errors.push(UsageErrorEvent {
                kind: UsageErrorKind::AddDuplicate,
                component_index: id.index(),
            });
            return;
        }
        let order = components.get(id).update_order;
        if order < 0 {
            self.before.push(id);
        } else if order > 0 {
            self.after.push(id);
        } else {
            self.additions.push_back(id);
        }
    }

    /// Stages a component for removal at the next refresh. Components not on
    /// the live list are skipped silently.
    ///
    /// With `also_children`, every component attached to the node subtree
    /// under `id`'s node is staged too.
    pub fn enqueue_remove(
        &mut self,
        components: &ComponentStore,
        nodes: &NodeStore,
        id: ComponentId,
        also_children: bool,
    ) {
        if self.live_set.contains(&id) {
            self.removals.push_back(id);
        }
        if also_children && components.is_alive(id) {
            let node = components.get(id).node();
            for child in components.for_subtree(nodes, node) {
                if self.live_set.contains(&child) {
                    self.removals.push_back(child);
                }
            }
        }
    }

    /// Applies staged list maintenance for the next frame, in this exact
    /// order:
    ///
    /// 1. Components that became invisible (or whose node became effectively
    ///    hidden, or that were destroyed) since the last frame are staged for
    ///    removal.
    /// 2. The "before" staging list merges into the live list by update
    ///    order.
    /// 3. The zero-order addition queue appends.
    /// 4. The "after" staging list merges like step 2.
    /// 5. The removal queue drains. Removal wins over same-frame addition,
    ///    and removing the focused component clears pointer focus.
    pub fn refresh(
        &mut self,
        components: &ComponentStore,
        nodes: &NodeStore,
        tracer: &mut Tracer<'_>,
    ) {
        self.frame_index += 1;
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Refresh,
        });

        for error in self.pending_errors.drain(..) {
            tracer.usage_error(&error);
        }

        // Step 1: drop what can no longer be dispatched.
        for &id in &self.live {
            let gone = !components.is_alive(id)
                || !components.get(id).visible
                || nodes.effective_hidden_at(components.get(id).node().index());
            if gone {
                self.removals.push_back(id);
            }
        }

        let mut added = 0_u32;

        // Steps 2-4: ordered merges around the plain append bucket.
        let staged = core::mem::take(&mut self.before);
        added += self.merge_ordered(components, staged);

        while let Some(id) = self.additions.pop_front() {
            if self.live_set.insert(id) {
                self.live.push(id);
                added += 1;
            }
        }

        let staged = core::mem::take(&mut self.after);
        added += self.merge_ordered(components, staged);

        // Step 5: removals last, so same-frame add+remove nets to absent.
        let mut removed = 0_u32;
        while let Some(id) = self.removals.pop_front() {
            if !self.live_set.remove(&id) {
                continue;
            }
            if let Some(position) = self.live.iter().position(|&live| live == id) {
                self.live.remove(position);
                removed += 1;
            }
            if self.focus == Some(id) {
                tracer.focus_change(&FocusChangeEvent {
                    previous: Some(id.index()),
                    current: None,
                });
                self.focus = None;
            }
        }

        tracer.refresh(&RefreshSummary {
            frame_index: self.frame_index,
            live: u32::try_from(self.live.len()).unwrap_or(u32::MAX),
            added,
            removed,
        });
        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Refresh,
        });
    }

    /// Determines which component the pointer rests on and records it as the
    /// focused component.
    ///
    /// Scans the live list in reverse (topmost first) for a focusable
    /// component whose hit rectangle contains the pointer. While the primary
    /// button is held or was just released, the previous focus is kept
    /// instead, so in-progress presses and drags stay attached to their
    /// component.
    pub fn resolve_pointer_focus(
        &mut self,
        components: &ComponentStore,
        nodes: &NodeStore,
        pointer: &PointerState,
        tracer: &mut Tracer<'_>,
    ) -> Option<ComponentId> {
        let previous = self.focus.filter(|&id| components.is_alive(id));

        let sticky = pointer.primary_held || pointer.primary_clicked;
        let next = if sticky && previous.is_some() {
            previous
        } else {
            self.live
                .iter()
                .rev()
                .copied()
                .find(|&id| {
                    components.is_alive(id)
                        && components.hit_rect(nodes, id).contains(pointer.position)
                })
        };

        if next != self.focus {
            tracer.focus_change(&FocusChangeEvent {
                previous: self.focus.map(ComponentId::index),
                current: next.map(ComponentId::index),
            });
        }
        self.focus = next;
        next
    }

    /// Runs the update pass: every visible auto-update component on the live
    /// list, in list order.
    ///
    /// The live list is not mutated during the pass; anything a component
    /// triggers (detach, hide) takes effect at the next refresh.
    pub fn update(
        &mut self,
        components: &mut ComponentStore,
        nodes: &mut NodeStore,
        dt: f32,
        tracer: &mut Tracer<'_>,
    ) {
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Update,
        });
        for i in 0..self.live.len() {
            let id = self.live[i];
            if !components.is_alive(id) {
                continue;
            }
            let component = components.get(id);
            if component.auto_update() && component.visible {
                components.advance(nodes, id, dt);
            }
        }
        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Update,
        });
    }

    /// Runs the draw pass: every visible auto-draw component on the live
    /// list, in list order (back to front).
    pub fn draw(
        &self,
        components: &ComponentStore,
        nodes: &NodeStore,
        canvas: &mut dyn Canvas,
        tracer: &mut Tracer<'_>,
    ) {
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Draw,
        });
        for &id in &self.live {
            if !components.is_alive(id) {
                continue;
            }
            let component = components.get(id);
            if component.auto_draw()
                && component.visible
                && !nodes.effective_hidden_at(component.node().index())
            {
                components.draw_base(nodes, id, canvas);
            }
        }
        tracer.phase_end(&PhaseEndEvent {
            frame_index: self.frame_index,
            phase: PhaseKind::Draw,
        });
    }

    /// Inserts each staged component at the first position from the tail
    /// whose neighbor's update order is not greater than its own, keeping
    /// staging order among equal orders.
    fn merge_ordered(&mut self, components: &ComponentStore, staged: Vec<ComponentId>) -> u32 {
        let mut added = 0;
        for id in staged {
            if !components.is_alive(id) || !self.live_set.insert(id) {
                continue;
            }
            let order = components.get(id).update_order;
            let mut index = self.live.len();
            while index > 0 {
                let neighbor = self.live[index - 1];
                let neighbor_order = if components.is_alive(neighbor) {
                    components.get(neighbor).update_order
                } else {
                    0
                };
                if neighbor_order <= order {
                    break;
                }
                index -= 1;
            }
            self.live.insert(index, id);
            added += 1;
        }
        added
    }
}
