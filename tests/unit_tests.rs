// Unit tests for Place Finder

use place_finder::core::{
    distance::{haversine_distance, sort_by_distance},
    filters::{apply_filters, matches_distance, matches_rating},
};
use place_finder::models::{Coordinates, FilterSpec, Place};

fn create_test_place(id: &str, rating: Option<f64>, distance: Option<f64>, types: &[&str]) -> Place {
    Place {
        id: id.to_string(),
        name: format!("Place {}", id),
        lat: 5.4164,
        lng: 100.3327,
        rating,
        distance,
        photo_url: None,
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

fn ids(places: &[Place]) -> Vec<&str> {
    places.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_haversine_distance_zero() {
    let points = [
        Coordinates::new(0.0, 0.0),
        Coordinates::new(5.4164, 100.3327),
        Coordinates::new(-33.8688, 151.2093),
        Coordinates::new(89.9, -179.9),
    ];

    for point in points {
        assert_eq!(haversine_distance(point, point), 0.0);
    }
}

#[test]
fn test_haversine_distance_symmetric() {
    let penang = Coordinates::new(5.4164, 100.3327);
    let kuala_lumpur = Coordinates::new(3.1390, 101.6869);

    let there = haversine_distance(penang, kuala_lumpur);
    let back = haversine_distance(kuala_lumpur, penang);

    assert!((there - back).abs() < 1e-9);
    // Penang to Kuala Lumpur is roughly 290 km as the crow flies
    assert!(there > 270.0 && there < 310.0, "Expected ~290km, got {}", there);
}

#[test]
fn test_haversine_distance_one_degree_longitude() {
    let distance = haversine_distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
    assert!((distance - 111.19).abs() < 0.1, "Expected ~111.19km, got {}", distance);
}

#[test]
fn test_sort_by_distance_keeps_ties_in_order() {
    let mut places = vec![
        create_test_place("a", None, Some(1.0), &[]),
        create_test_place("b", None, Some(0.5), &[]),
        create_test_place("c", None, Some(1.0), &[]),
        create_test_place("d", None, None, &[]),
    ];

    sort_by_distance(&mut places);

    assert_eq!(ids(&places), vec!["d", "b", "a", "c"]);
}

#[test]
fn test_empty_spec_keeps_everything_sorted() {
    let places = vec![
        create_test_place("3km", Some(4.0), Some(3.0), &["park"]),
        create_test_place("exact", None, Some(0.0), &[]),
        create_test_place("1km", None, Some(1.0), &["cafe"]),
        create_test_place("unknown", Some(2.0), None, &[]),
    ];

    let result = apply_filters(&places, &FilterSpec::default());

    assert_eq!(ids(&result), vec!["exact", "unknown", "1km", "3km"]);
}

#[test]
fn test_rating_threshold_filter() {
    let places = vec![
        create_test_place("two", Some(2.0), Some(1.0), &[]),
        create_test_place("four-half", Some(4.5), Some(2.0), &[]),
    ];

    let result = apply_filters(&places, &FilterSpec::new().with_ratings([4.0]));

    assert_eq!(ids(&result), vec!["four-half"]);
}

#[test]
fn test_multiple_thresholds_pass_higher_rating() {
    let place = create_test_place("four-half", Some(4.5), None, &[]);
    assert!(matches_rating(&place, &FilterSpec::new().with_ratings([3.0, 4.0])));
}

#[test]
fn test_max_distance_filter() {
    let places = vec![
        create_test_place("one", None, Some(1.0), &[]),
        create_test_place("six", None, Some(6.0), &[]),
    ];

    let result = apply_filters(&places, &FilterSpec::new().with_max_distance(5.0));

    assert_eq!(ids(&result), vec!["one"]);
}

#[test]
fn test_unset_distance_always_passes() {
    let place = create_test_place("unknown", None, None, &[]);

    for max_distance in [0.0, 0.1, 1.0, 1000.0] {
        assert!(matches_distance(&place, &FilterSpec::new().with_max_distance(max_distance)));
    }
}

#[test]
fn test_type_filter_any_overlap() {
    let places = vec![
        create_test_place("mall", None, Some(1.0), &["shopping_mall", "point_of_interest"]),
        create_test_place("museum", None, Some(2.0), &["museum", "tourist_attraction"]),
        create_test_place("untagged", None, Some(0.5), &[]),
    ];

    let result = apply_filters(&places, &FilterSpec::new().with_types(["museum", "park"]));

    assert_eq!(ids(&result), vec!["museum"]);
}

#[test]
fn test_apply_filters_is_idempotent() {
    let places = vec![
        create_test_place("a", Some(4.6), Some(4.0), &["cafe"]),
        create_test_place("b", Some(3.9), Some(0.2), &["cafe"]),
        create_test_place("c", Some(4.1), None, &["cafe", "restaurant"]),
        create_test_place("d", Some(4.8), Some(12.0), &["cafe"]),
        create_test_place("e", Some(5.0), Some(2.0), &["park"]),
    ];
    let spec = FilterSpec::new()
        .with_types(["cafe", "restaurant"])
        .with_ratings([4.0])
        .with_max_distance(5.0);

    let once = apply_filters(&places, &spec);
    let twice = apply_filters(&once, &spec);

    assert_eq!(ids(&once), vec!["c", "a"]);
    assert_eq!(once, twice);
}

#[test]
fn test_apply_filters_leaves_input_untouched() {
    let places = vec![
        create_test_place("far", None, Some(9.0), &[]),
        create_test_place("near", None, Some(1.0), &[]),
    ];
    let snapshot = places.clone();

    let _ = apply_filters(&places, &FilterSpec::new().with_max_distance(3.0));

    assert_eq!(places, snapshot);
}

#[test]
fn test_negative_zero_distance_ties_with_unset() {
    let places = vec![
        create_test_place("unset", None, None, &[]),
        create_test_place("negative-zero", None, Some(-0.0), &[]),
        create_test_place("one", None, Some(1.0), &[]),
    ];

    let result = apply_filters(&places, &FilterSpec::default());

    assert_eq!(ids(&result), vec!["unset", "negative-zero", "one"]);
}
