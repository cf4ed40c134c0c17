use crate::models::{BoundingBox, Coordinate, Place};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Check if a point is within a bounding box, edges included
#[inline]
pub fn in_bounds(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && lon >= bbox.min_lon
        && lon <= bbox.max_lon
}

/// Find the place closest to a point
///
/// Returns the place and its distance in kilometers, or `None` for an empty slice.
/// Ties keep the earliest place.
pub fn nearest<'a>(lat: f64, lon: f64, places: &'a [Place]) -> Option<(&'a Place, f64)> {
    places.iter().fold(None, |best, place| {
        let Coordinate { lat: plat, lon: plon } = place.location;
        let distance = haversine_distance(lat, lon, plat, plon);
        match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((place, distance)),
        }
    })
}

/// Round to two decimal places
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
