use crate::core::distance::sort_by_distance;
use crate::models::{FilterSpec, Place};

/// Check the place's categories against the selected types
///
/// Passes when no type is selected or the place carries at least one of them.
#[inline]
pub fn matches_type(place: &Place, spec: &FilterSpec) -> bool {
    spec.types.is_empty() || place.types.iter().any(|t| spec.types.contains(t))
}

/// Check the place's rating against the selected thresholds
///
/// Thresholds are minimums: a 4.5 rated place passes both 3 and 4. Unrated
/// places fail as soon as any threshold is selected.
#[inline]
pub fn matches_rating(place: &Place, spec: &FilterSpec) -> bool {
    if spec.ratings.is_empty() {
        return true;
    }

    match place.rating {
        Some(rating) => spec.ratings.iter().any(|threshold| rating >= *threshold),
        None => false,
    }
}

/// Check the place's distance against the limit
///
/// A zero limit disables the check and places without a distance always pass.
#[inline]
pub fn matches_distance(place: &Place, spec: &FilterSpec) -> bool {
    if spec.max_distance == 0.0 {
        return true;
    }

    place.distance.map_or(true, |d| d <= spec.max_distance)
}

/// Apply a filter specification and re-sort by ascending distance
///
/// Pure: the input is left untouched and applying the same spec to the output
/// again yields the same sequence.
pub fn apply_filters(places: &[Place], spec: &FilterSpec) -> Vec<Place> {
    let mut filtered: Vec<Place> = places
        .iter()
        .filter(|place| matches_type(place, spec))
        .filter(|place| matches_rating(place, spec))
        .filter(|place| matches_distance(place, spec))
        .cloned()
        .collect();

    sort_by_distance(&mut filtered);

    tracing::trace!("Filtered {} places down to {}", places.len(), filtered.len());

    filtered
}
