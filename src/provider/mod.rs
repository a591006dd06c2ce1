//! Map provider identities and their native coordinate adapters.
//!
//! Each provider gets one thin adapter translating canonical coordinates to
//! and from its native point type. The measurement state machine itself is
//! provider-agnostic; adapters only parameterise [`crate::draw::Scene`] and
//! [`crate::input::InputNormalizer`].

pub mod cesium;
pub mod google;
pub mod leaflet;

pub use cesium::{Cartesian3, CesiumGlobe};
pub use google::{GoogleLatLng, GoogleMaps};
pub use leaflet::{LeafletLatLng, LeafletMap};

use crate::coord::{Coordinate, NativeCoord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three interchangeable renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Google-Maps-like 2D provider
    Google,
    /// Cesium-like 3D globe
    Cesium,
    /// Leaflet-like 2D provider
    Leaflet,
}

impl ProviderKind {
    /// Name recorded in `MeasurementRecord::provider_name` by default.
    pub fn default_name(self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Cesium => "cesium",
            ProviderKind::Leaflet => "leaflet",
        }
    }

    /// Degrees within which the provider's own point comparison treats two
    /// points as equal. The globe compares after an ECEF round trip.
    pub fn equality_epsilon(self) -> f64 {
        match self {
            ProviderKind::Google | ProviderKind::Leaflet => crate::coord::DEFAULT_EPSILON,
            ProviderKind::Cesium => 1e-7,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "google-maps" => Ok(ProviderKind::Google),
            "cesium" => Ok(ProviderKind::Cesium),
            "leaflet" => Ok(ProviderKind::Leaflet),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// Translation between canonical coordinates and a provider's native points.
pub trait ProviderAdapter {
    /// The SDK's own point type.
    type Native: Clone + fmt::Debug + PartialEq;

    fn kind(&self) -> ProviderKind;

    fn to_native(&self, coord: &Coordinate) -> Self::Native;

    /// Wraps a native point for [`crate::coord::normalize`].
    fn from_native(&self, native: &Self::Native) -> NativeCoord;
}
