use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::LetterKey;
use crate::renderer::color::Palette;
use crate::systems::geometry::{ArrowStyle, BadgeStyle};

/// Letters fetched when no key list is configured.
pub const DEFAULT_LETTER_KEYS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid trace config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("canvas size must be positive, got {width}x{height}")]
    Canvas { width: f32, height: f32 },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("at least one letter key is required")]
    NoLetterKeys,
}

/// Configuration for the trace engine. Every field has a default, so a JSON
/// config only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Logical canvas width (default: 300).
    pub canvas_width: f32,
    /// Logical canvas height (default: 300).
    pub canvas_height: f32,
    /// Delay between points of one stroke, in ms (default: 90).
    pub point_delay_ms: u32,
    /// Pause before each stroke after the first, in ms (default: 220).
    pub stroke_pause_ms: u32,
    /// Radius of each traced point marker (default: 4).
    pub point_radius: f32,
    pub badge: BadgeStyle,
    pub arrow: ArrowStyle,
    /// Stroke colors by stroke position.
    pub palette: Palette,
    /// Letters to fetch from the geometry source.
    pub letter_keys: Vec<LetterKey>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            canvas_width: 300.0,
            canvas_height: 300.0,
            point_delay_ms: 90,
            stroke_pause_ms: 220,
            point_radius: 4.0,
            badge: BadgeStyle::default(),
            arrow: ArrowStyle::default(),
            palette: Palette::default(),
            letter_keys: DEFAULT_LETTER_KEYS
                .iter()
                .filter_map(|&c| LetterKey::from_char(c))
                .collect(),
        }
    }
}

impl TraceConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::Canvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if !(self.point_radius > 0.0) {
            return Err(ConfigError::NonPositive("point_radius"));
        }
        if !(self.badge.radius > 0.0) {
            return Err(ConfigError::NonPositive("badge.radius"));
        }
        if !(self.arrow.length > 0.0) {
            return Err(ConfigError::NonPositive("arrow.length"));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.letter_keys.is_empty() {
            return Err(ConfigError::NoLetterKeys);
        }
        Ok(())
    }

    /// Canvas size as a vector.
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TraceConfig::default();
        assert_eq!(config.canvas_size(), Vec2::new(300.0, 300.0));
        assert_eq!(config.point_delay_ms, 90);
        assert_eq!(config.stroke_pause_ms, 220);
        assert_eq!(config.letter_keys.len(), 6);
        assert_eq!(config.palette.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = TraceConfig::from_json(
            r#"{ "point_delay_ms": 40, "letter_keys": ["x", "Y"], "badge": { "radius": 12 } }"#,
        )
        .unwrap();
        assert_eq!(config.point_delay_ms, 40);
        assert_eq!(config.stroke_pause_ms, 220);
        assert_eq!(config.letter_keys[0].as_char(), 'X');
        assert_eq!(config.badge.radius, 12.0);
        assert_eq!(config.badge.offset, 26.0);
    }

    #[test]
    fn rejects_invalid() {
        assert!(matches!(
            TraceConfig::from_json(r#"{ "canvas_width": 0 }"#),
            Err(ConfigError::Canvas { .. })
        ));
        assert!(matches!(TraceConfig::from_json(r#"{ "palette": [] }"#), Err(ConfigError::EmptyPalette)));
        assert!(matches!(TraceConfig::from_json(r#"{ "letter_keys": [] }"#), Err(ConfigError::NoLetterKeys)));
        assert!(matches!(TraceConfig::from_json(r#"{ "letter_keys": ["12"] }"#), Err(ConfigError::Parse(_))));
        assert!(matches!(
            TraceConfig::from_json(r#"{ "point_radius": -1 }"#),
            Err(ConfigError::NonPositive("point_radius"))
        ));
    }
}
