//! Geodesic calculations backing distance and area results.

use crate::coord::Coordinate;
use geo::{ChamberlainDuquetteArea, Distance, Haversine, LineString, Polygon};

/// Great-circle distance in metres between two coordinates.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    Haversine.distance(a.to_point(), b.to_point())
}

/// Sum of great-circle segment lengths along `coords`.
pub fn path_length(coords: &[Coordinate]) -> f64 {
    coords.windows(2).map(|pair| distance(&pair[0], &pair[1])).sum()
}

/// Unsigned spherical area in square metres of the ring through `coords`.
///
/// Fewer than three vertices have no area.
pub fn polygon_area(coords: &[Coordinate]) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }

    let ring: LineString<f64> = coords
        .iter()
        .map(|c| (c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .into();
    Polygon::new(ring, vec![]).chamberlain_duquette_unsigned_area()
}

/// Label anchor for a shape: the point itself, a segment midpoint, or the
/// vertex mean of a polygon.
///
/// Longitudes are unwrapped around the first vertex before averaging, so a
/// shape crossing the antimeridian anchors next to it rather than at 0°.
pub fn anchor(coords: &[Coordinate]) -> Option<Coordinate> {
    match coords {
        [] => None,
        [single] => Some(*single),
        [first, ..] => {
            let n = coords.len() as f64;
            let (lat, lon, h) = coords.iter().fold((0.0, 0.0, 0.0), |acc, c| {
                let lon = first.longitude + wrap_longitude(c.longitude - first.longitude);
                (acc.0 + c.latitude, acc.1 + lon, acc.2 + c.height)
            });
            Some(Coordinate {
                latitude: lat / n,
                longitude: wrap_longitude(lon / n),
                height: h / n,
            })
        }
    }
}

/// Brings a longitude into [-180, 180).
fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
