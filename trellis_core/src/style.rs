// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style records and the style sheet.
//!
//! A [`Style`] is an immutable record loaded from configuration: per-state
//! colors, an outline color, padding, a color cross-fade duration, and named
//! child styles for compound widgets that style their own children. The
//! engine only reads these values; how they are authored (JSON documents,
//! code) is a collaborator concern — `trellis_debug` ships a JSON loader.
//!
//! Lookup failures never abort: [`StyleSheet::resolve`] falls back to the
//! [neutral style](Style::neutral) (fully transparent, zero padding), so a
//! missing entry renders as nothing rather than stopping the frame.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;

use kurbo::Insets;

use crate::color::Rgba;
use crate::trace::Tracer;

/// Colors keyed by interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateColors {
    /// Color in the resting state.
    pub base: Rgba,
    /// Color while the pointer rests on the component.
    pub hover: Rgba,
    /// Color while pressed.
    pub pressed: Rgba,
    /// Color while selected.
    pub selected: Rgba,
    /// Color while disabled (overrides all other states).
    pub disabled: Rgba,
}

impl StateColors {
    /// All states fully transparent.
    pub const TRANSPARENT: Self = Self {
        base: Rgba::TRANSPARENT,
        hover: Rgba::TRANSPARENT,
        pressed: Rgba::TRANSPARENT,
        selected: Rgba::TRANSPARENT,
        disabled: Rgba::TRANSPARENT,
    };

    /// Uses one color for every state.
    #[must_use]
    pub const fn uniform(color: Rgba) -> Self {
        Self {
            base: color,
            hover: color,
            pressed: color,
            selected: color,
            disabled: color,
        }
    }
}

/// An immutable style record for one component kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Per-state fill colors.
    pub colors: StateColors,
    /// Outline color (transparent disables the outline).
    pub outline: Rgba,
    /// Content padding.
    pub padding: Insets,
    /// Seconds over which state-color changes cross-fade. Zero switches
    /// instantly.
    pub color_fade: f32,
    /// Named sub-styles applied by compound widgets to their own children.
    pub children: BTreeMap<String, Style>,
}

/// The shared neutral fallback instance.
static NEUTRAL: Style = Style::neutral();

impl Default for Style {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Style {
    /// The neutral style: fully transparent, zero padding, no cross-fade.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            colors: StateColors::TRANSPARENT,
            outline: Rgba::TRANSPARENT,
            padding: Insets::ZERO,
            color_fade: 0.0,
            children: BTreeMap::new(),
        }
    }

    /// Looks up a named child style.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }
}

/// A collection of named styles.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    styles: BTreeMap<String, Style>,
}

impl StyleSheet {
    /// Creates an empty style sheet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    /// Inserts or replaces a named style.
    pub fn insert(&mut self, name: &str, style: Style) {
        self.styles.insert(name.to_owned(), style);
    }

    /// Looks up a named style.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    /// Looks up a named style, falling back to the neutral style when the
    /// name is absent.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &Style {
        self.styles.get(name).unwrap_or(&NEUTRAL)
    }

    /// Like [`resolve`](Self::resolve), but reports a fallback through the
    /// diagnostic channel.
    #[must_use]
    pub fn resolve_traced(&self, name: &str, tracer: &mut Tracer<'_>) -> &Style {
        match self.styles.get(name) {
            Some(style) => style,
            None => {
                tracer.style_fallback(name);
                &NEUTRAL
            }
        }
    }

    /// Returns the number of styles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns whether the sheet is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
