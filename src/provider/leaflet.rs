//! Leaflet-like provider: `LatLng` with an optional altitude.

use super::{ProviderAdapter, ProviderKind};
use crate::coord::{Coordinate, NativeCoord};

/// Native `L.LatLng` equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafletLatLng {
    pub lat: f64,
    pub lng: f64,
    pub alt: Option<f64>,
}

/// Adapter for the Leaflet-like renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafletMap;

impl ProviderAdapter for LeafletMap {
    type Native = LeafletLatLng;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Leaflet
    }

    fn to_native(&self, coord: &Coordinate) -> LeafletLatLng {
        LeafletLatLng {
            lat: coord.latitude,
            lng: coord.longitude,
            alt: (coord.height != 0.0).then_some(coord.height),
        }
    }

    fn from_native(&self, native: &LeafletLatLng) -> NativeCoord {
        NativeCoord::LatLng {
            lat: native.lat,
            lng: native.lng,
            alt: native.alt,
        }
    }
}
