//! Graphic styles handed to the drawing collaborator.

use super::color::{self, Color};
use crate::config::StyleConfig;
use crate::measure::RecordStatus;

/// Visual parameters for one graphic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicStyle {
    /// Stroke (or text) color
    pub color: Color,
    /// Stroke width, or point diameter, in pixels
    pub width: f64,
    /// Fill for polygons
    pub fill: Option<Color>,
}

/// Styles for every graphic role, resolved once from config.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSet {
    pub point: GraphicStyle,
    pub line: GraphicStyle,
    pub polygon: GraphicStyle,
    pub label: GraphicStyle,
    /// Stroke color replacing the role color while previewing or dragging
    pub moving: Color,
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::from_config(&StyleConfig::default())
    }
}

impl StyleSet {
    pub fn from_config(config: &StyleConfig) -> Self {
        let polygon_color = config.polygon_color.to_color();
        Self {
            point: GraphicStyle {
                color: config.point_color.to_color(),
                width: config.point_size,
                fill: None,
            },
            line: GraphicStyle {
                color: config.line_color.to_color(),
                width: config.line_width,
                fill: None,
            },
            polygon: GraphicStyle {
                color: polygon_color,
                width: config.line_width,
                fill: Some(polygon_color.with_alpha(config.polygon_opacity)),
            },
            label: GraphicStyle {
                color: config.label_color.to_color(),
                width: 1.0,
                fill: Some(color::BLACK.with_alpha(0.6)),
            },
            moving: config.moving_color.to_color(),
        }
    }

    pub fn point(&self, status: RecordStatus) -> GraphicStyle {
        self.for_status(self.point, status)
    }

    pub fn line(&self, status: RecordStatus) -> GraphicStyle {
        self.for_status(self.line, status)
    }

    pub fn polygon(&self, status: RecordStatus) -> GraphicStyle {
        let mut style = self.for_status(self.polygon, status);
        if status == RecordStatus::Moving {
            style.fill = self.polygon.fill.map(|fill| self.moving.with_alpha(fill.a));
        }
        style
    }

    pub fn label(&self, _status: RecordStatus) -> GraphicStyle {
        self.label
    }

    fn for_status(&self, base: GraphicStyle, status: RecordStatus) -> GraphicStyle {
        match status {
            RecordStatus::Moving => GraphicStyle {
                color: self.moving,
                ..base
            },
            RecordStatus::Pending | RecordStatus::Completed => base,
        }
    }
}
