//! Google-Maps-like provider: flat `LatLng` points without altitude.

use super::{ProviderAdapter, ProviderKind};
use crate::coord::{Coordinate, NativeCoord};

/// Native `google.maps.LatLng` equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Adapter for the Google-Maps-like renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleMaps;

impl ProviderAdapter for GoogleMaps {
    type Native = GoogleLatLng;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn to_native(&self, coord: &Coordinate) -> GoogleLatLng {
        GoogleLatLng {
            lat: coord.latitude,
            lng: coord.longitude,
        }
    }

    fn from_native(&self, native: &GoogleLatLng) -> NativeCoord {
        NativeCoord::LatLng {
            lat: native.lat,
            lng: native.lng,
            alt: None,
        }
    }
}
