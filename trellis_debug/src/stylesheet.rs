// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON style-sheet loading.
//!
//! The document is an object of style entries:
//!
//! ```json
//! {
//!     "button": {
//!         "colors": {
//!             "base": [0.2, 0.2, 0.2, 1.0],
//!             "hover": "#3a3a3aff",
//!             "pressed": "#505050",
//!             "selected": [0.1, 0.3, 0.5, 1.0],
//!             "disabled": [0.2, 0.2, 0.2, 0.5]
//!         },
//!         "outline": "#000000",
//!         "padding": [4, 2, 4, 2],
//!         "color_fade": 0.15,
//!         "children": { "label": { "colors": { "base": "#ffffff" } } }
//!     }
//! }
//! ```
//!
//! Colors are `[r, g, b, a]` arrays in 0.0–1.0 or `#rrggbb`/`#rrggbbaa` hex
//! strings. Padding is a single number (uniform) or `[left, top, right,
//! bottom]`. Every field is optional.
//!
//! Loading only fails on unparseable JSON. Malformed *entries* degrade to
//! their neutral defaults and are reported as warnings, so one bad style
//! cannot take the whole sheet down.

use serde_json::Value;
use trellis_core::color::Rgba;
use trellis_core::kurbo::Insets;
use trellis_core::style::{Style, StyleSheet};

/// The result of parsing a style document.
#[derive(Debug, Default)]
pub struct ParsedStyleSheet {
    /// The loaded sheet; malformed entries hold neutral defaults.
    pub sheet: StyleSheet,
    /// One message per malformed field or entry.
    pub warnings: Vec<String>,
}

/// Parses a JSON style document.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] only when the document is
/// not valid JSON at all.
pub fn parse_stylesheet(json: &str) -> Result<ParsedStyleSheet, serde_json::Error> {
    let root: Value = serde_json::from_str(json)?;
    let mut parsed = ParsedStyleSheet::default();

    let Value::Object(entries) = root else {
        parsed
            .warnings
            .push("style document root is not an object".into());
        return Ok(parsed);
    };

    for (name, value) in entries {
        let style = parse_style(&value, &name, &mut parsed.warnings);
        parsed.sheet.insert(&name, style);
    }
    Ok(parsed)
}

fn parse_style(value: &Value, path: &str, warnings: &mut Vec<String>) -> Style {
    let mut style = Style::neutral();
    let Value::Object(fields) = value else {
        warnings.push(format!("{path}: style entry is not an object"));
        return style;
    };

    if let Some(colors) = fields.get("colors") {
        if let Value::Object(colors) = colors {
            let mut read = |key: &str, slot: &mut Rgba| {
                if let Some(v) = colors.get(key) {
                    match parse_color(v) {
                        Some(color) => *slot = color,
                        None => warnings.push(format!("{path}: bad color for state {key:?}")),
                    }
                }
            };
            read("base", &mut style.colors.base);
            read("hover", &mut style.colors.hover);
            read("pressed", &mut style.colors.pressed);
            read("selected", &mut style.colors.selected);
            read("disabled", &mut style.colors.disabled);
        } else {
            warnings.push(format!("{path}: \"colors\" is not an object"));
        }
    }

    if let Some(outline) = fields.get("outline") {
        match parse_color(outline) {
            Some(color) => style.outline = color,
            None => warnings.push(format!("{path}: bad outline color")),
        }
    }

    if let Some(padding) = fields.get("padding") {
        match parse_insets(padding) {
            Some(insets) => style.padding = insets,
            None => warnings.push(format!("{path}: bad padding")),
        }
    }

    if let Some(fade) = fields.get("color_fade") {
        match fade.as_f64() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "sub-second durations are well within f32 range"
            )]
            Some(seconds) if seconds >= 0.0 => style.color_fade = seconds as f32,
            _ => warnings.push(format!("{path}: bad color_fade")),
        }
    }

    if let Some(children) = fields.get("children") {
        if let Value::Object(children) = children {
            for (child_name, child_value) in children {
                let child_path = format!("{path}.{child_name}");
                let child = parse_style(child_value, &child_path, warnings);
                style.children.insert(child_name.clone(), child);
            }
        } else {
            warnings.push(format!("{path}: \"children\" is not an object"));
        }
    }

    style
}

fn parse_color(value: &Value) -> Option<Rgba> {
    match value {
        Value::Array(values) if values.len() == 4 => {
            let mut parts = [0.0_f32; 4];
            for (part, v) in parts.iter_mut().zip(values) {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "color components are 0.0-1.0"
                )]
                {
                    *part = v.as_f64()? as f32;
                }
            }
            Some(Rgba::new(parts[0], parts[1], parts[2], parts[3]))
        }
        Value::String(text) => parse_hex_color(text),
        _ => None,
    }
}

fn parse_hex_color(text: &str) -> Option<Rgba> {
    let hex = text.strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let (r, g, b, a) = match hex.len() {
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    let channel = |v: u8| f32::from(v) / 255.0;
    Some(Rgba::new(channel(r), channel(g), channel(b), channel(a)))
}

fn parse_insets(value: &Value) -> Option<Insets> {
    match value {
        Value::Number(n) => Some(Insets::uniform(n.as_f64()?)),
        Value::Array(values) if values.len() == 4 => {
            let mut parts = [0.0_f64; 4];
            for (part, v) in parts.iter_mut().zip(values) {
                *part = v.as_f64()?;
            }
            Some(Insets::new(parts[0], parts[1], parts[2], parts[3]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_entry() {
        let parsed = parse_stylesheet(
            r##"{
                "button": {
                    "colors": {
                        "base": [0.2, 0.2, 0.2, 1.0],
                        "hover": "#ffffff",
                        "disabled": "#00000080"
                    },
                    "outline": "#000000",
                    "padding": [4, 2, 4, 2],
                    "color_fade": 0.15,
                    "children": {
                        "label": { "colors": { "base": "#ff0000" } }
                    }
                }
            }"##,
        )
        .unwrap();

        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let button = parsed.sheet.get("button").unwrap();
        assert_eq!(button.colors.base, Rgba::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(button.colors.hover, Rgba::WHITE);
        assert!((button.colors.disabled.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(button.outline, Rgba::BLACK);
        assert_eq!(button.padding, Insets::new(4.0, 2.0, 4.0, 2.0));
        assert!((button.color_fade - 0.15).abs() < 1e-6);
        assert_eq!(
            button.child("label").unwrap().colors.base,
            Rgba::new(1.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn malformed_fields_warn_and_fall_back() {
        let parsed = parse_stylesheet(
            r#"{
                "broken": {
                    "colors": { "base": "not-a-color" },
                    "padding": "nope"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.warnings.len(), 2, "{:?}", parsed.warnings);
        let style = parsed.sheet.get("broken").unwrap();
        assert!(style.colors.base.is_transparent(), "neutral fallback");
        assert_eq!(style.padding, Insets::ZERO);
    }

    #[test]
    fn non_object_root_warns_and_loads_nothing() {
        let parsed = parse_stylesheet("[1, 2, 3]").unwrap();
        assert!(parsed.sheet.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_stylesheet("{ not json").is_err());
    }

    #[test]
    fn uniform_padding_number() {
        let parsed = parse_stylesheet(r#"{ "frame": { "padding": 8 } }"#).unwrap();
        assert_eq!(
            parsed.sheet.get("frame").unwrap().padding,
            Insets::uniform(8.0)
        );
    }
}
