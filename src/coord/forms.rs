//! Presentation forms used by pool snapshots.

use super::{Coordinate, ellipsoid};
use serde::{Deserialize, Serialize};

/// Which encoding a pool snapshot should project coordinates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateForm {
    /// Degrees as stored.
    #[default]
    Canonical,
    /// ECEF metres, as consumed by globe renderers.
    Cartesian,
    /// Longitude/latitude in radians.
    Radians,
}

/// A coordinate projected into one of the [`CoordinateForm`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectedCoordinate {
    Degrees(Coordinate),
    Cartesian { x: f64, y: f64, z: f64 },
    Radians {
        longitude: f64,
        latitude: f64,
        height: f64,
    },
}

impl CoordinateForm {
    /// Projects a canonical coordinate. Pure view transform.
    pub fn project(self, coord: &Coordinate) -> ProjectedCoordinate {
        match self {
            CoordinateForm::Canonical => ProjectedCoordinate::Degrees(*coord),
            CoordinateForm::Cartesian => {
                let [x, y, z] = ellipsoid::to_cartesian(coord);
                ProjectedCoordinate::Cartesian { x, y, z }
            }
            CoordinateForm::Radians => ProjectedCoordinate::Radians {
                longitude: coord.longitude.to_radians(),
                latitude: coord.latitude.to_radians(),
                height: coord.height,
            },
        }
    }
}

impl std::str::FromStr for CoordinateForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canonical" | "degrees" => Ok(CoordinateForm::Canonical),
            "cartesian" | "cartesian3" => Ok(CoordinateForm::Cartesian),
            "radians" | "cartographic" => Ok(CoordinateForm::Radians),
            other => Err(format!(
                "unknown coordinate form '{other}' (expected canonical, cartesian or radians)"
            )),
        }
    }
}
