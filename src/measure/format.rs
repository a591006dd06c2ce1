//! Human-readable label text for measurements.

use super::{MeasureKind, MeasurementRecord};
use std::fmt;

/// What a label graphic displays.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelContent {
    pub kind: MeasureKind,
    pub values: Vec<f64>,
    /// Replaces the formatted value when set
    pub custom: Option<String>,
}

impl LabelContent {
    /// Content reflecting the record's current measurements and custom label.
    pub fn for_record(record: &MeasurementRecord) -> Self {
        Self {
            kind: record.kind,
            values: record.measurements.clone(),
            custom: record.label.clone(),
        }
    }

    /// Content for a preview value that has no record-level label yet.
    pub fn preview(kind: MeasureKind, values: Vec<f64>) -> Self {
        Self {
            kind,
            values,
            custom: None,
        }
    }

    /// Unit suffix matching the formatted text.
    pub fn unit(&self) -> &'static str {
        let value = self.values.first().copied().unwrap_or(0.0);
        match self.kind {
            MeasureKind::Distance if value >= 1_000.0 => "km",
            MeasureKind::Area if value >= 1_000_000.0 => "km²",
            kind => kind.unit(),
        }
    }
}

impl fmt::Display for LabelContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(custom) = &self.custom {
            return f.write_str(custom);
        }

        let value = self.values.first().copied().unwrap_or(0.0);
        match self.kind {
            MeasureKind::PointInfo => match self.values.as_slice() {
                [lat, lon, ..] => write!(f, "{lat:.6}, {lon:.6}"),
                _ => Ok(()),
            },
            MeasureKind::Distance if value >= 1_000.0 => {
                write!(f, "{:.2} {}", value / 1_000.0, self.unit())
            }
            MeasureKind::Area if value >= 1_000_000.0 => {
                write!(f, "{:.2} {}", value / 1_000_000.0, self.unit())
            }
            _ => write!(f, "{value:.2} {}", self.unit()),
        }
    }
}
