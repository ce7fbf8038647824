use crate::models::{Coordinates, Place};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `a` - First point, degrees
/// * `b` - Second point, degrees
///
/// # Returns
/// Great-circle distance in kilometers
#[inline]
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Sort places ascending by distance, unset distances counting as zero.
///
/// The sort is stable so ties keep the provider's order. `-0.0` and NaN sort
/// as zero.
pub fn sort_by_distance(places: &mut [Place]) {
    places.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
}

#[inline]
fn sort_key(place: &Place) -> f64 {
    let distance = place.distance_or_zero();
    // -0.0 == 0.0, so this folds both zeros into +0.0
    if distance.is_nan() || distance == 0.0 {
        0.0
    } else {
        distance
    }
}
