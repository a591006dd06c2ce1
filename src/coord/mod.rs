//! Canonical coordinate model.
//!
//! Every coordinate that reaches the measurement pool or a record is a
//! [`Coordinate`] in degrees. Provider-native shapes ([`NativeCoord`]) are
//! converted once at the provider boundary with [`normalize`] and never stored.

pub mod ellipsoid;
pub mod forms;

pub use forms::{CoordinateForm, ProjectedCoordinate};

use crate::error::MeasureError;
use serde::{Deserialize, Serialize};

/// Fallback tolerance (degrees) for [`equal`] when a provider has no opinion.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Canonical geographic coordinate in degrees, height in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub height: f64,
}

impl Coordinate {
    /// Creates a coordinate at ground level.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            height: 0.0,
        }
    }

    /// Returns a copy with the given height in metres.
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Converts to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// Point shapes accepted from the map providers.
///
/// Deserialisation is untagged, so `{lat, lng}`, `{latitude, longitude, height}`
/// and `{x, y, z}` all parse. Radian cartographics are programmatic only since
/// their field names collide with the canonical shape.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NativeCoord {
    /// Google/Leaflet style `LatLng` in degrees, optional altitude in metres.
    LatLng {
        lat: f64,
        #[serde(alias = "lon")]
        lng: f64,
        #[serde(default)]
        alt: Option<f64>,
    },
    /// Already canonical.
    Canonical(Coordinate),
    /// Earth-centred, earth-fixed WGS84 position in metres (Cesium `Cartesian3`).
    Cartesian { x: f64, y: f64, z: f64 },
    /// Cesium `Cartographic` in radians.
    #[serde(skip_deserializing)]
    Cartographic {
        longitude: f64,
        latitude: f64,
        height: f64,
    },
}

impl From<Coordinate> for NativeCoord {
    fn from(coord: Coordinate) -> Self {
        NativeCoord::Canonical(coord)
    }
}

/// Converts any supported input shape into a canonical [`Coordinate`].
///
/// # Errors
/// [`MeasureError::InvalidCoordinate`] when no finite latitude/longitude pair
/// can be extracted, the latitude is outside [-90, 90], or an ECEF vector has
/// zero length. Callers drop the triggering event.
pub fn normalize(native: NativeCoord) -> Result<Coordinate, MeasureError> {
    let coord = match native {
        NativeCoord::LatLng { lat, lng, alt } => Coordinate {
            latitude: lat,
            longitude: lng,
            height: alt.unwrap_or(0.0),
        },
        NativeCoord::Canonical(coord) => coord,
        NativeCoord::Cartesian { x, y, z } => {
            if ![x, y, z].iter().all(|v| v.is_finite()) {
                return Err(MeasureError::InvalidCoordinate(format!(
                    "non-finite cartesian ({x}, {y}, {z})"
                )));
            }
            ellipsoid::from_cartesian([x, y, z]).ok_or_else(|| {
                MeasureError::InvalidCoordinate("cartesian at the earth's centre".to_string())
            })?
        }
        NativeCoord::Cartographic {
            longitude,
            latitude,
            height,
        } => Coordinate {
            latitude: latitude.to_degrees(),
            longitude: longitude.to_degrees(),
            height,
        },
    };

    validate(coord)
}

fn validate(coord: Coordinate) -> Result<Coordinate, MeasureError> {
    if !coord.latitude.is_finite() || !coord.longitude.is_finite() {
        return Err(MeasureError::InvalidCoordinate(format!(
            "non-finite lat/lon ({}, {})",
            coord.latitude, coord.longitude
        )));
    }
    if !(-90.0..=90.0).contains(&coord.latitude) {
        return Err(MeasureError::InvalidCoordinate(format!(
            "latitude {} out of range",
            coord.latitude
        )));
    }

    let height = if coord.height.is_finite() {
        coord.height
    } else {
        0.0
    };
    Ok(Coordinate { height, ..coord })
}

/// Compares latitude and longitude within `epsilon` degrees.
///
/// Height is ignored. `None` falls back to [`DEFAULT_EPSILON`].
pub fn equal(a: &Coordinate, b: &Coordinate, epsilon: Option<f64>) -> bool {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    (a.latitude - b.latitude).abs() <= eps && (a.longitude - b.longitude).abs() <= eps
}
