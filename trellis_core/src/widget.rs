// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component records and storage.
//!
//! A [`Component`] is the behavioral wrapper around one transform node: it
//! owns visibility, enabled state, the interaction-state machine, per-state
//! colors, update ordering, and the auto/manual dispatch flags. Exactly one
//! component wraps any given node; the binding is established once at
//! creation and never changes.
//!
//! The state machine (`None → Hover → Pressed/Selected → None`) is *stored*
//! here, not decided: concrete widgets drive transitions from their own hit
//! tests and click handling and call [`Component::set_state`].
//!
//! Instead of a deep inheritance chain, widget-specific logic hangs off an
//! optional boxed [`Behavior`] — a trait seam in the same spirit as the
//! [`Canvas`] contract. The base update/draw passes handle effects, color
//! cross-fades, and background/outline emission; a behavior adds whatever a
//! concrete widget needs on top.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::effect::Effects;
use crate::node::{NodeId, NodeStore};
use crate::style::{StateColors, Style};

/// The interaction state stored on every component.
///
/// Transitions are driven externally by pointer containment tests and click
/// events; the base only stores and exposes the current state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionState {
    /// No interaction.
    #[default]
    None,
    /// The pointer rests on the component.
    Hover,
    /// The primary button is held on the component.
    Pressed,
    /// The component is selected.
    Selected,
}

/// A handle to a component in a [`ComponentStore`].
///
/// Generational, like [`NodeId`]: stale handles are detected after a
/// component is destroyed and its slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ComponentId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl core::fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ComponentId({}@gen{})", self.idx, self.generation)
    }
}

/// Widget-specific update/draw logic attached to a component.
///
/// Both methods default to no-ops. During dispatch the behavior is
/// temporarily detached from its slot, so a behavior must not install a new
/// hook on its own component from inside `update`.
pub trait Behavior {
    /// Per-frame logic, called after the base has advanced effects.
    fn update(
        &mut self,
        components: &mut ComponentStore,
        nodes: &mut NodeStore,
        id: ComponentId,
        dt: f32,
    ) {
        _ = (components, nodes, id, dt);
    }

    /// Draw pass, called after the base has emitted background and outline.
    fn draw(
        &self,
        components: &ComponentStore,
        nodes: &NodeStore,
        id: ComponentId,
        canvas: &mut dyn Canvas,
    ) {
        _ = (components, nodes, id, canvas);
    }
}

/// The behavioral wrapper around one transform node.
pub struct Component {
    node: NodeId,
    /// Whether the component takes part in update/draw at all. An invisible
    /// component is auto-removed from the scheduler at the next refresh.
    pub visible: bool,
    /// Disabled components render with the disabled color and should be
    /// skipped by widget interaction logic.
    pub enabled: bool,
    /// Whether pointer-focus resolution may return this component.
    pub can_focus: bool,
    /// Clamp the hit rectangle to the ancestor chain, for children that
    /// visually overflow a clipped container.
    pub clamp_hit_to_parent: bool,
    /// Per-state fill colors.
    pub colors: StateColors,
    /// Outline color (transparent disables the outline).
    pub outline: Rgba,
    /// Alpha modulation applied on top of the state color (driven by fades).
    pub alpha: f32,
    /// Position in the scheduler: negative orders update/draw before the
    /// default bucket, positive after.
    pub update_order: i32,
    /// Timed effects.
    pub effects: Effects,
    state: InteractionState,
    previous_state: InteractionState,
    color_fade: f32,
    color_fade_remaining: f32,
    auto_update: bool,
    auto_draw: bool,
    behavior: Option<Box<dyn Behavior>>,
}

impl core::fmt::Debug for Component {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Component")
            .field("node", &self.node)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .field("update_order", &self.update_order)
            .field("auto_update", &self.auto_update)
            .field("auto_draw", &self.auto_draw)
            .finish_non_exhaustive()
    }
}

impl Component {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            visible: true,
            enabled: true,
            can_focus: true,
            clamp_hit_to_parent: false,
            colors: StateColors::TRANSPARENT,
            outline: Rgba::TRANSPARENT,
            alpha: 1.0,
            update_order: 0,
            effects: Effects::default(),
            state: InteractionState::None,
            previous_state: InteractionState::None,
            color_fade: 0.0,
            color_fade_remaining: 0.0,
            auto_update: true,
            auto_draw: true,
            behavior: None,
        }
    }

    /// Returns the node this component wraps.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the current interaction state.
    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Sets the interaction state, starting a color cross-fade if the style
    /// defines one.
    pub fn set_state(&mut self, state: InteractionState) {
        if self.state != state {
            self.previous_state = self.state;
            self.color_fade_remaining = self.color_fade;
        }
        self.state = state;
    }

    /// Whether the scheduler's update pass dispatches to this component.
    #[must_use]
    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Whether the scheduler's draw pass dispatches to this component.
    #[must_use]
    pub fn auto_draw(&self) -> bool {
        self.auto_draw
    }

    /// Restores automatic dispatch after a manual-update takeover.
    pub fn set_auto_update(&mut self, auto: bool) {
        self.auto_update = auto;
    }

    /// Restores automatic dispatch after a manual-draw takeover.
    pub fn set_auto_draw(&mut self, auto: bool) {
        self.auto_draw = auto;
    }

    /// Installs the widget-specific behavior hook.
    pub fn set_behavior(&mut self, behavior: Box<dyn Behavior>) {
        self.behavior = Some(behavior);
    }

    /// Copies colors, outline, and the cross-fade duration from a style
    /// record.
    pub fn apply_style(&mut self, style: &Style) {
        self.colors = style.colors;
        self.outline = style.outline;
        self.color_fade = style.color_fade;
    }

    /// Returns the fill color for the given state (ignoring cross-fade).
    #[must_use]
    pub fn color_for(&self, state: InteractionState) -> Rgba {
        if !self.enabled {
            return self.colors.disabled;
        }
        match state {
            InteractionState::None => self.colors.base,
            InteractionState::Hover => self.colors.hover,
            InteractionState::Pressed => self.colors.pressed,
            InteractionState::Selected => self.colors.selected,
        }
    }

    /// Returns the fill color to draw this frame: the current state's color,
    /// cross-faded from the previous state's while a fade is in progress,
    /// with the component alpha applied.
    #[must_use]
    pub fn effective_color(&self) -> Rgba {
        let target = self.color_for(self.state);
        let color = if self.color_fade_remaining > 0.0 && self.color_fade > 0.0 {
            let t = 1.0 - self.color_fade_remaining / self.color_fade;
            self.color_for(self.previous_state).lerp(target, t)
        } else {
            target
        };
        color.mul_alpha(self.alpha)
    }

    /// Advances the color cross-fade timer.
    fn tick(&mut self, dt: f32) {
        self.color_fade_remaining = (self.color_fade_remaining - dt).max(0.0);
    }
}

struct Slot {
    generation: u32,
    entry: Option<Component>,
}

/// Storage for all components of one UI tree.
///
/// Slots are recycled through a free list with generation counters, like
/// [`NodeStore`]'s node slots. A node-to-component index enforces the
/// one-component-per-node invariant and serves subtree lookups.
#[derive(Debug)]
pub struct ComponentStore {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    by_node: BTreeMap<NodeId, ComponentId>,
}

impl core::fmt::Debug for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slot")
            .field("generation", &self.generation)
            .field("occupied", &self.entry.is_some())
            .finish()
    }
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore {
    /// Creates an empty component store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            by_node: BTreeMap::new(),
        }
    }

    /// Creates a component bound to `node`.
    ///
    /// # Panics
    ///
    /// Panics if the node already has a component; the binding is exclusive
    /// and set exactly once.
    pub fn create(&mut self, node: NodeId) -> ComponentId {
        assert!(
            !self.by_node.contains_key(&node),
            "node {node:?} already has a component"
        );
        let id = if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.entry = Some(Component::new(node));
            ComponentId {
                idx,
                generation: slot.generation,
            }
        } else {
            let idx = u32::try_from(self.slots.len()).expect("component count fits in u32");
            self.slots.push(Slot {
                generation: 0,
                entry: Some(Component::new(node)),
            });
            ComponentId { idx, generation: 0 }
        };
        self.by_node.insert(node, id);
        id
    }

    /// Destroys a component, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: ComponentId) {
        let node = self.get(id).node;
        let slot = &mut self.slots[id.idx as usize];
        slot.generation += 1;
        slot.entry = None;
        self.free_list.push(id.idx);
        self.by_node.remove(&node);
    }

    /// Returns whether the given handle refers to a live component.
    #[must_use]
    pub fn is_alive(&self, id: ComponentId) -> bool {
        self.slots
            .get(id.idx as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.entry.is_some())
    }

    /// Returns the component for a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> &Component {
        self.slot(id)
            .as_ref()
            .expect("stale ComponentId: slot vacated")
    }

    /// Returns the component for a handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn get_mut(&mut self, id: ComponentId) -> &mut Component {
        let slot = &mut self.slots[id.idx as usize];
        assert!(
            slot.generation == id.generation,
            "stale ComponentId: {id:?} (current gen: {})",
            slot.generation
        );
        slot.entry
            .as_mut()
            .expect("stale ComponentId: slot vacated")
    }

    /// Returns the component bound to a node, if any.
    #[must_use]
    pub fn for_node(&self, node: NodeId) -> Option<ComponentId> {
        self.by_node.get(&node).copied()
    }

    /// Collects the components attached to nodes in the subtree rooted at
    /// `node` (excluding `node` itself), in depth-first order.
    #[must_use]
    pub fn for_subtree(&self, nodes: &NodeStore, node: NodeId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        self.collect_subtree(nodes, node, &mut out);
        out
    }

    fn collect_subtree(&self, nodes: &NodeStore, node: NodeId, out: &mut Vec<ComponentId>) {
        let children: Vec<NodeId> = nodes.children(node).collect();
        for child in children {
            if let Some(id) = self.for_node(child) {
                out.push(id);
            }
            self.collect_subtree(nodes, child, out);
        }
    }

    /// Returns the rectangle pointer-focus resolution tests against:
    /// the node's world rectangle, optionally clamped to the ancestor chain,
    /// or an empty rectangle for unfocusable components.
    #[must_use]
    pub fn hit_rect(&self, nodes: &NodeStore, id: ComponentId) -> Rect {
        let component = self.get(id);
        if !component.can_focus {
            return Rect::ZERO;
        }
        let mut rect = nodes.rect(component.node);
        if component.clamp_hit_to_parent {
            for ancestor in nodes.ancestors(component.node) {
                rect = rect.intersect(nodes.rect(ancestor));
            }
        }
        rect
    }

    /// Advances one component's base state: effects, cross-fade timer, and
    /// the behavior hook.
    ///
    /// A fade that completes with detach-on-complete detaches the node and
    /// hides the component, so the next scheduler refresh drops it from the
    /// live list.
    pub fn advance(&mut self, nodes: &mut NodeStore, id: ComponentId, dt: f32) {
        let (node, output) = {
            let component = self.get_mut(id);
            component.tick(dt);
            (component.node, component.effects.advance(dt))
        };

        if let Some(alpha) = output.alpha {
            self.get_mut(id).alpha = alpha;
        }
        if let Some(scale) = output.scale {
            nodes.set_local_scale(node, scale);
        }
        if output.detach {
            nodes.remove_from_parent(node);
            self.get_mut(id).visible = false;
        }

        self.dispatch_behavior_update(nodes, id, dt);
    }

    /// Emits the base draw calls for one component: state-colored background,
    /// outline, and the flash overlay.
    pub fn draw_base(&self, nodes: &NodeStore, id: ComponentId, canvas: &mut dyn Canvas) {
        let component = self.get(id);
        let rect = nodes.rect(component.node);

        let color = component.effective_color();
        if !color.is_transparent() {
            canvas.fill_rect(rect, color);
        }
        if !component.outline.is_transparent() {
            canvas.stroke_rect(rect, component.outline, 1.0);
        }
        if let Some(flash) = &component.effects.flash {
            let intensity = flash.intensity();
            if intensity > 0.0 {
                let flash_rect = rect.inflate(flash.inflate.x, flash.inflate.y);
                canvas.fill_rect(flash_rect, flash.color.mul_alpha(intensity));
            }
        }

        if let Some(behavior) = &self.get(id).behavior {
            behavior.draw(self, nodes, id, canvas);
        }
    }

    /// Forces an update regardless of the auto flag, clearing it as a side
    /// effect so the scheduler stops double-updating a manually driven
    /// component. Optionally recurses into the node subtree.
    pub fn update_manually(
        &mut self,
        nodes: &mut NodeStore,
        id: ComponentId,
        dt: f32,
        also_children: bool,
    ) {
        if !self.is_alive(id) || !self.get(id).visible {
            return;
        }
        self.get_mut(id).auto_update = false;
        self.advance(nodes, id, dt);
        if also_children {
            let node = self.get(id).node;
            for child in self.for_subtree(nodes, node) {
                self.update_manually(nodes, child, dt, false);
            }
        }
    }

    /// Forces a draw regardless of the auto flag, clearing it as a side
    /// effect. Optionally recurses into the node subtree.
    pub fn draw_manually(
        &mut self,
        nodes: &NodeStore,
        id: ComponentId,
        canvas: &mut dyn Canvas,
        also_children: bool,
    ) {
        if !self.is_alive(id) || !self.get(id).visible {
            return;
        }
        self.get_mut(id).auto_draw = false;
        self.draw_base(nodes, id, canvas);
        if also_children {
            let node = self.get(id).node;
            for child in self.for_subtree(nodes, node) {
                self.draw_manually(nodes, child, canvas, false);
            }
        }
    }

    /// Dispatches the behavior's update hook, if one is installed.
    ///
    /// The behavior is detached from its slot for the duration of the call
    /// so it can receive the whole store mutably.
    fn dispatch_behavior_update(&mut self, nodes: &mut NodeStore, id: ComponentId, dt: f32) {
        let Some(mut behavior) = self.get_mut(id).behavior.take() else {
            return;
        };
        behavior.update(self, nodes, id, dt);
        if self.is_alive(id) {
            let slot = self.get_mut(id);
            if slot.behavior.is_none() {
                slot.behavior = Some(behavior);
            }
        }
    }

    fn slot(&self, id: ComponentId) -> &Option<Component> {
        let slot = &self.slots[id.idx as usize];
        assert!(
            slot.generation == id.generation,
            "stale ComponentId: {id:?} (current gen: {})",
            slot.generation
        );
        &slot.entry
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::*;

    fn stores() -> (NodeStore, ComponentStore) {
        (
            NodeStore::new(Rect::new(0.0, 0.0, 1000.0, 800.0)),
            ComponentStore::new(),
        )
    }

    #[test]
    fn one_component_per_node() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        assert_eq!(components.for_node(node), Some(id));
        assert_eq!(components.get(id).node(), node);
    }

    #[test]
    #[should_panic(expected = "already has a component")]
    fn double_binding_panics() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let _ = components.create(node);
        let _ = components.create(node);
    }

    #[test]
    fn destroy_frees_the_node_binding() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        components.destroy(id);
        assert!(!components.is_alive(id));
        assert_eq!(components.for_node(node), None);

        // The node can be re-bound, and the recycled slot gets a new
        // generation.
        let id2 = components.create(node);
        assert!(components.is_alive(id2));
        assert!(!components.is_alive(id));
    }

    #[test]
    fn state_color_selection() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        let c = components.get_mut(id);
        c.colors = StateColors {
            base: Rgba::new(0.1, 0.1, 0.1, 1.0),
            hover: Rgba::new(0.5, 0.5, 0.5, 1.0),
            pressed: Rgba::new(0.9, 0.9, 0.9, 1.0),
            selected: Rgba::new(0.2, 0.4, 0.6, 1.0),
            disabled: Rgba::new(0.0, 0.0, 0.0, 0.5),
        };

        assert_eq!(c.effective_color(), c.colors.base);
        c.set_state(InteractionState::Hover);
        assert_eq!(c.effective_color(), c.colors.hover);

        // Disabled overrides every state.
        c.enabled = false;
        assert_eq!(c.effective_color(), c.colors.disabled);
    }

    #[test]
    fn state_change_cross_fades() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        {
            let c = components.get_mut(id);
            c.colors.base = Rgba::new(0.0, 0.0, 0.0, 1.0);
            c.colors.hover = Rgba::new(1.0, 1.0, 1.0, 1.0);
            c.color_fade = 0.2;
            c.set_state(InteractionState::Hover);
            // Fade just started: still showing the previous color.
            assert_eq!(c.effective_color(), Rgba::new(0.0, 0.0, 0.0, 1.0));
        }

        components.advance(&mut nodes, id, 0.1);
        let mid = components.get(id).effective_color();
        assert!((mid.r - 0.5).abs() < 1e-5, "halfway through the fade");

        components.advance(&mut nodes, id, 0.2);
        assert_eq!(
            components.get(id).effective_color(),
            Rgba::new(1.0, 1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn fade_detach_hides_and_detaches() {
        let (mut nodes, mut components) = stores();
        let parent = nodes.create_node();
        let node = nodes.create_node();
        assert!(nodes.add_child(parent, node));
        let id = components.create(node);

        components
            .get_mut(id)
            .effects
            .start_fade(1.0, 0.0, 0.5, 0.0, true);
        components.advance(&mut nodes, id, 1.0);

        assert_eq!(nodes.parent(node), None, "fade must detach the node");
        assert!(!components.get(id).visible);
        assert_eq!(components.get(id).alpha, 0.0);
    }

    #[test]
    fn pulsate_writes_local_scale() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        components
            .get_mut(id)
            .effects
            .start_pulsate(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0), 1.0);

        components.advance(&mut nodes, id, 0.5);
        assert!((nodes.local_scale(node).x - 3.0).abs() < 1e-6);

        components.advance(&mut nodes, id, 0.6);
        assert_eq!(nodes.local_scale(node), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn manual_update_clears_the_auto_flag() {
        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        assert!(components.get(id).auto_update());

        components.update_manually(&mut nodes, id, 0.016, false);
        assert!(!components.get(id).auto_update());
    }

    #[test]
    fn subtree_lookup_follows_node_order() {
        let (mut nodes, mut components) = stores();
        let root = nodes.create_node();
        let a = nodes.create_node();
        let b = nodes.create_node();
        let a_inner = nodes.create_node();
        assert!(nodes.add_child(root, a));
        assert!(nodes.add_child(root, b));
        assert!(nodes.add_child(a, a_inner));

        let ca = components.create(a);
        let cb = components.create(b);
        let ca_inner = components.create(a_inner);

        assert_eq!(
            components.for_subtree(&nodes, root),
            alloc::vec![ca, ca_inner, cb]
        );
    }

    #[test]
    fn hit_rect_clamps_to_ancestors() {
        let (mut nodes, mut components) = stores();
        let parent = nodes.create_absolute(Size::new(100.0, 100.0), None, crate::anchor::Anchor::TopLeft);
        let child = nodes.create_absolute(
            Size::new(300.0, 40.0),
            Some(parent),
            crate::anchor::Anchor::TopLeft,
        );
        nodes.set_fixed_size(child, true);
        let _ = nodes.evaluate();

        let id = components.create(child);
        assert_eq!(
            components.hit_rect(&nodes, id),
            Rect::new(0.0, 0.0, 300.0, 40.0)
        );

        components.get_mut(id).clamp_hit_to_parent = true;
        assert_eq!(
            components.hit_rect(&nodes, id),
            Rect::new(0.0, 0.0, 100.0, 40.0)
        );

        components.get_mut(id).can_focus = false;
        assert!(!components
            .hit_rect(&nodes, id)
            .contains(Point::new(10.0, 10.0)));
    }

    #[test]
    fn behavior_update_runs_and_is_restored() {
        struct Counter;
        impl Behavior for Counter {
            fn update(
                &mut self,
                components: &mut ComponentStore,
                _nodes: &mut NodeStore,
                id: ComponentId,
                _dt: f32,
            ) {
                components.get_mut(id).update_order += 1;
            }
        }

        let (mut nodes, mut components) = stores();
        let node = nodes.create_node();
        let id = components.create(node);
        components.get_mut(id).set_behavior(Box::new(Counter));

        components.advance(&mut nodes, id, 0.016);
        components.advance(&mut nodes, id, 0.016);
        assert_eq!(components.get(id).update_order, 2, "hook survives dispatch");
    }
}
