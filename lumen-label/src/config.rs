//! JSON label configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lumen_core::{Color32, Vec2};
use lumen_text::{GenerationSettings, HorizontalWrapMode, TextAnchor, VerticalWrapMode};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid label config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid colour: {0:?}")]
    InvalidColor(String),
    #[error("'{field}' must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

/// Host-side settings of one label. Missing fields take their defaults.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub font_size: f32,
    pub line_spacing: f32,
    /// `#RRGGBB`-style or named colour.
    pub color: String,
    pub alignment: TextAnchor,
    pub horizontal_overflow: HorizontalWrapMode,
    pub vertical_overflow: VerticalWrapMode,
    pub pixels_per_unit: f32,
    pub rich_text: bool,
    /// `[width, height]` of the label rect in layout units.
    pub size: [f32; 2],
    pub pivot: [f32; 2],
    pub family: String,
    pub bold_weight: u16,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_spacing: 1.0,
            color: String::from("#FFFFFF"),
            alignment: TextAnchor::UpperLeft,
            horizontal_overflow: HorizontalWrapMode::Wrap,
            vertical_overflow: VerticalWrapMode::Truncate,
            pixels_per_unit: 1.0,
            rich_text: true,
            size: [160.0, 30.0],
            pivot: [0.5, 0.5],
            family: String::from("sans-serif"),
            bold_weight: 700,
        }
    }
}

impl LabelConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("font_size", self.font_size), ("pixels_per_unit", self.pixels_per_unit)] {
            // `!(v > 0)` also rejects NaN.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        self.color()?;
        Ok(())
    }

    pub fn color(&self) -> Result<Color32, ConfigError> {
        Color32::parse_html(&self.color).ok_or_else(|| ConfigError::InvalidColor(self.color.clone()))
    }

    pub fn extents(&self) -> Vec2 {
        Vec2::new(self.size[0], self.size[1])
    }

    /// Generation settings for a rect of `extents`.
    pub fn generation_settings(&self, extents: Vec2) -> Result<GenerationSettings, ConfigError> {
        self.validate()?;
        Ok(GenerationSettings {
            font_size: self.font_size,
            line_spacing: self.line_spacing,
            color: self.color()?,
            rich_text: self.rich_text,
            extents,
            pivot: Vec2::new(self.pivot[0], self.pivot[1]),
            alignment: self.alignment,
            horizontal_overflow: self.horizontal_overflow,
            vertical_overflow: self.vertical_overflow,
            scale_factor: self.pixels_per_unit,
            family: self.family.clone(),
            bold_weight: self.bold_weight,
        })
    }
}

// ===================================================================
// Tests
// ===================================================================
