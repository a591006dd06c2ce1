//! Measurement kinds and their point-count rules.

use super::geometry;
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// What a measurement records.
///
/// The kind decides how many clicks complete a measurement and how the
/// numeric results are derived from its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureKind {
    /// Single point: reports its raw coordinate components
    PointInfo,
    /// Two points: great-circle distance in metres
    Distance,
    /// Closed polygon of three or more points: area in square metres
    Area,
}

impl MeasureKind {
    /// All kinds, in the order a provider session creates their modes.
    pub const ALL: [MeasureKind; 3] = [
        MeasureKind::PointInfo,
        MeasureKind::Distance,
        MeasureKind::Area,
    ];

    /// Number of clicks after which the measurement finalizes on its own.
    ///
    /// Areas have no fixed count; they close on right-click/double-click.
    pub fn required_points(self) -> Option<usize> {
        match self {
            MeasureKind::PointInfo => Some(1),
            MeasureKind::Distance => Some(2),
            MeasureKind::Area => None,
        }
    }

    /// Minimum number of coordinates a completed record of this kind holds.
    pub fn min_points(self) -> usize {
        match self {
            MeasureKind::PointInfo => 1,
            MeasureKind::Distance => 2,
            MeasureKind::Area => 3,
        }
    }

    /// Whether a completed record with `count` coordinates is well formed.
    pub fn accepts_count(self, count: usize) -> bool {
        match self.required_points() {
            Some(required) => count == required,
            None => count >= self.min_points(),
        }
    }

    /// Whether the measurement should finalize right after `count` clicks.
    pub fn completes_at(self, count: usize) -> bool {
        self.required_points() == Some(count)
    }

    /// Derives the numeric results for the given coordinates.
    pub fn compute(self, coords: &[Coordinate]) -> Vec<f64> {
        match self {
            MeasureKind::PointInfo => coords
                .first()
                .map(|c| vec![c.latitude, c.longitude, c.height])
                .unwrap_or_default(),
            MeasureKind::Distance => vec![geometry::path_length(coords)],
            MeasureKind::Area => vec![geometry::polygon_area(coords)],
        }
    }

    /// Unit suffix for the primary measurement.
    pub fn unit(self) -> &'static str {
        match self {
            MeasureKind::PointInfo => "deg",
            MeasureKind::Distance => "m",
            MeasureKind::Area => "m²",
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            MeasureKind::PointInfo => "point-info",
            MeasureKind::Distance => "distance",
            MeasureKind::Area => "area",
        }
    }
}

impl std::fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeasureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "point-info" | "point" => Ok(MeasureKind::PointInfo),
            "distance" => Ok(MeasureKind::Distance),
            "area" => Ok(MeasureKind::Area),
            other => Err(format!("unknown measurement kind '{other}'")),
        }
    }
}
