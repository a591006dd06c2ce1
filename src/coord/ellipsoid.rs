//! WGS84 geodetic <-> earth-centred cartesian conversions.

use super::Coordinate;

/// WGS84 semi-major axis in metres.
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;

const ECCENTRICITY_SQ: f64 = FLATTENING * (2.0 - FLATTENING);
const SEMI_MINOR_AXIS: f64 = SEMI_MAJOR_AXIS * (1.0 - FLATTENING);

/// Converts a geodetic coordinate into ECEF `[x, y, z]` metres.
pub fn to_cartesian(coord: &Coordinate) -> [f64; 3] {
    let lat = coord.latitude.to_radians();
    let lon = coord.longitude.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let n = SEMI_MAJOR_AXIS / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
    [
        (n + coord.height) * cos_lat * cos_lon,
        (n + coord.height) * cos_lat * sin_lon,
        (n * (1.0 - ECCENTRICITY_SQ) + coord.height) * sin_lat,
    ]
}

/// Converts ECEF metres back to a geodetic coordinate (Bowring's method).
///
/// Returns `None` for the zero vector, which has no defined latitude.
pub fn from_cartesian([x, y, z]: [f64; 3]) -> Option<Coordinate> {
    let p = x.hypot(y);
    if p == 0.0 && z == 0.0 {
        return None;
    }

    let ep2 = (SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS - SEMI_MINOR_AXIS * SEMI_MINOR_AXIS)
        / (SEMI_MINOR_AXIS * SEMI_MINOR_AXIS);
    let theta = (z * SEMI_MAJOR_AXIS).atan2(p * SEMI_MINOR_AXIS);
    let (sin_t, cos_t) = theta.sin_cos();

    let lat = (z + ep2 * SEMI_MINOR_AXIS * sin_t.powi(3))
        .atan2(p - ECCENTRICITY_SQ * SEMI_MAJOR_AXIS * cos_t.powi(3));
    let lon = y.atan2(x);

    let (sin_lat, cos_lat) = lat.sin_cos();
    let height = p * cos_lat + z * sin_lat
        - SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();

    Some(Coordinate {
        latitude: lat.to_degrees(),
        longitude: lon.to_degrees(),
        height,
    })
}
