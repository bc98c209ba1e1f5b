use geo::{HaversineDistance, Point};

use crate::models::Coordinate;

/// Great-circle distance between two coordinates in kilometers
#[inline]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let a = Point::new(from.longitude, from.latitude);
    let b = Point::new(to.longitude, to.latitude);
    a.haversine_distance(&b) / 1000.0
}

/// Whether `point` lies within `radius_m` meters of `center`
#[inline]
pub fn is_within_radius(center: Coordinate, point: Coordinate, radius_m: u32) -> bool {
    haversine_km(center, point) * 1000.0 <= f64::from(radius_m)
}
