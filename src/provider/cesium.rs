//! Cesium-like globe provider: positions are WGS84 `Cartesian3` vectors.

use super::{ProviderAdapter, ProviderKind};
use crate::coord::{Coordinate, NativeCoord, ellipsoid};

/// Native `Cesium.Cartesian3` equivalent, metres from the earth's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Adapter for the 3D globe renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CesiumGlobe;

impl ProviderAdapter for CesiumGlobe {
    type Native = Cartesian3;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Cesium
    }

    fn to_native(&self, coord: &Coordinate) -> Cartesian3 {
        let [x, y, z] = ellipsoid::to_cartesian(coord);
        Cartesian3 { x, y, z }
    }

    fn from_native(&self, native: &Cartesian3) -> NativeCoord {
        NativeCoord::Cartesian {
            x: native.x,
            y: native.y,
            z: native.z,
        }
    }
}
