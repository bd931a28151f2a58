//! Colors and the stroke palette.
//!
//! Stroke `i` of any letter is drawn with palette entry `i mod len`, so the
//! palette doubles as the legend shown next to the canvas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`: expected #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA u8 values (0-255).
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(err)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) || !(digits.len() == 6 || digits.len() == 8) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba8(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// `#rrggbbaa`, the inverse of [`Rgba::from_hex`].
    pub fn to_hex(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}{:02x}", c(self.r), c(self.g), c(self.b), c(self.a))
    }

    /// CSS `rgba()` string for Canvas 2D style properties.
    pub fn to_css(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgba({}, {}, {}, {})", c(self.r), c(self.g), c(self.b), self.a.clamp(0.0, 1.0))
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fallback ink when no palette color is available.
    pub const INK: Self = Self::rgb(0x11 as f32 / 255.0, 0x11 as f32 / 255.0, 0x11 as f32 / 255.0);
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

/// A named palette color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Rgba,
}

/// Fixed, ordered table of stroke colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

const DEFAULT_PALETTE: [(&str, u8, u8, u8); 5] = [
    ("Deep Blue", 0x00, 0x55, 0x87),
    ("Sky Blue", 0x0e, 0x8e, 0xe9),
    ("Navy", 0x1c, 0x42, 0x5a),
    ("Slate", 0x67, 0x72, 0x75),
    ("Steel Blue", 0x4c, 0x67, 0x81),
];

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Color for the stroke at `index` (0-based) within a letter.
    pub fn color_for(&self, index: usize) -> Rgba {
        if self.entries.is_empty() {
            return Rgba::INK;
        }
        self.entries[index % self.entries.len()].color
    }

    /// Legend name for the stroke at `index`.
    pub fn name_for(&self, index: usize) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries[index % self.entries.len()].name.as_str())
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PALETTE
                .iter()
                .map(|&(name, r, g, b)| PaletteEntry {
                    name: name.to_string(),
                    color: Rgba::rgba8(r, g, b, 255),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Rgba::from_hex("#ff8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.5).abs() < 0.01);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);

        let c = Rgba::from_hex("#005587ff").unwrap();
        assert_eq!(c.to_hex(), "#005587ff");

        assert!(Rgba::from_hex("005587").is_err());
        assert!(Rgba::from_hex("#12345").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
    }

    #[test]
    fn css_string() {
        let c = Rgba::WHITE.with_alpha(0.95);
        assert_eq!(c.to_css(), "rgba(255, 255, 255, 0.95)");
    }

    #[test]
    fn palette_wraps_by_stroke_position() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.color_for(0), palette.color_for(5));
        assert_eq!(palette.color_for(2), palette.color_for(7));
        assert_ne!(palette.color_for(0), palette.color_for(1));
        assert_eq!(palette.name_for(6), Some("Sky Blue"));
    }

    #[test]
    fn empty_palette_falls_back_to_ink() {
        let palette = Palette::new(Vec::new());
        assert_eq!(palette.color_for(3), Rgba::INK);
        assert_eq!(palette.name_for(0), None);
    }

    #[test]
    fn palette_json() {
        let json = r##"[{ "name": "Red", "color": "#ff0000" }]"##;
        let palette: Palette = serde_json::from_str(json).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.color_for(9), Rgba::rgb(1.0, 0.0, 0.0));
    }
}
