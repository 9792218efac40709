//! Great-circle distance and proximity ranking.
//!
//! Distances use the haversine formula on a spherical Earth. Raw distances are
//! never rounded; rounding to two decimal places happens once, when records
//! are ranked for presentation.

use crate::school::{Coordinate, RankedSchool, School};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two coordinates.
///
/// # Returns
///
/// Distance in kilometers. Always finite and non-negative for finite input,
/// including points at the poles and on the antimeridian.
///
/// # Example
///
/// ```
/// use schoolfinder::proximity::distance_km;
/// use schoolfinder::Coordinate;
///
/// let times_square = Coordinate::new(40.7589, -73.9851);
/// let empire_state = Coordinate::new(40.7484, -73.9857);
/// assert!((distance_km(times_square, empire_state) - 1.17).abs() < 0.01);
/// ```
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1] near antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to two decimal places.
#[must_use]
pub fn round_distance(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Order schools by ascending distance from `reference`.
///
/// Each school is annotated with its rounded distance. Schools with equal
/// rounded distances keep their relative order from `schools`. The input is
/// left untouched.
#[must_use]
pub fn rank_by_proximity(schools: &[School], reference: Coordinate) -> Vec<RankedSchool> {
    let mut ranked: Vec<RankedSchool> = schools
        .iter()
        .map(|school| RankedSchool {
            distance: round_distance(distance_km(reference, school.location())),
            school: school.clone(),
        })
        .collect();

    // `sort_by` is stable, which gives the tie-break.
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}
