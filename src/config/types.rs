//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pointer interaction tuning.
///
/// Controls how drags are told apart from clicks and how points are matched
/// back to stored measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InteractionConfig {
    /// Pointer travel in pixels before a press on a point becomes a drag
    /// (valid range: 1.0 - 50.0)
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,

    /// Milliseconds after a drag release during which clicks are ignored
    /// (valid range: 0 - 2000)
    #[serde(default = "default_drag_cooldown")]
    pub drag_cooldown_ms: u64,

    /// Degrees within which two coordinates are the same point when the
    /// provider has no tolerance of its own (valid range: 1e-12 - 1e-3)
    #[serde(default = "default_coordinate_epsilon")]
    pub coordinate_epsilon: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: default_drag_threshold(),
            drag_cooldown_ms: default_drag_cooldown(),
            coordinate_epsilon: default_coordinate_epsilon(),
        }
    }
}

impl InteractionConfig {
    pub fn drag_cooldown(&self) -> Duration {
        Duration::from_millis(self.drag_cooldown_ms)
    }
}

/// Measurement graphic appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleConfig {
    /// Vertex marker color
    #[serde(default = "default_point_color")]
    pub point_color: ColorSpec,

    /// Distance line color
    #[serde(default = "default_line_color")]
    pub line_color: ColorSpec,

    /// Area outline color; the fill uses the same color at `polygon_opacity`
    #[serde(default = "default_polygon_color")]
    pub polygon_color: ColorSpec,

    /// Color of graphics while previewing or dragging
    #[serde(default = "default_moving_color")]
    pub moving_color: ColorSpec,

    /// Label text color
    #[serde(default = "default_label_color")]
    pub label_color: ColorSpec,

    /// Line and outline width in pixels (valid range: 0.5 - 20.0)
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Vertex marker diameter in pixels (valid range: 1.0 - 40.0)
    #[serde(default = "default_point_size")]
    pub point_size: f64,

    /// Area fill opacity (valid range: 0.0 - 1.0)
    #[serde(default = "default_polygon_opacity")]
    pub polygon_opacity: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            point_color: default_point_color(),
            line_color: default_line_color(),
            polygon_color: default_polygon_color(),
            moving_color: default_moving_color(),
            label_color: default_label_color(),
            line_width: default_line_width(),
            point_size: default_point_size(),
            polygon_opacity: default_polygon_opacity(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_drag_threshold() -> f64 {
    5.0
}

fn default_drag_cooldown() -> u64 {
    200
}

fn default_coordinate_epsilon() -> f64 {
    crate::coord::DEFAULT_EPSILON
}

fn default_point_color() -> ColorSpec {
    ColorSpec::Name("yellow".to_string())
}

fn default_line_color() -> ColorSpec {
    ColorSpec::Name("yellow".to_string())
}

fn default_polygon_color() -> ColorSpec {
    ColorSpec::Name("green".to_string())
}

fn default_moving_color() -> ColorSpec {
    ColorSpec::Name("orange".to_string())
}

fn default_label_color() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_line_width() -> f64 {
    3.0
}

fn default_point_size() -> f64 {
    8.0
}

fn default_polygon_opacity() -> f64 {
    0.3
}
