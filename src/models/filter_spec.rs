use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category tags offered as type filters
pub const PLACE_TYPES: [&str; 5] = ["restaurant", "museum", "park", "shopping_mall", "cafe"];

/// Minimum-rating thresholds offered as rating filters
pub const STAR_RATINGS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

/// Distance limits in kilometers offered as distance filters
pub const DISTANCE_OPTIONS_KM: [f64; 4] = [1.0, 3.0, 5.0, 10.0];

/// Declarative filter configuration held by the caller
///
/// Empty `types` or `ratings` leave that dimension unconstrained and a
/// `max_distance` of `0` means no distance limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub types: BTreeSet<String>,
    /// "At least" thresholds, kept free of duplicates
    #[serde(default)]
    pub ratings: Vec<f64>,
    #[serde(rename = "maxDistance", default)]
    pub max_distance: f64,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ratings<I>(mut self, ratings: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.ratings.clear();
        for rating in ratings {
            if !self.ratings.contains(&rating) {
                self.ratings.push(rating);
            }
        }
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// True when no dimension constrains the result
    pub fn is_unconstrained(&self) -> bool {
        self.types.is_empty() && self.ratings.is_empty() && self.max_distance == 0.0
    }

    /// Add the type if absent, remove it otherwise
    pub fn toggle_type(&mut self, place_type: &str) {
        if !self.types.remove(place_type) {
            self.types.insert(place_type.to_string());
        }
    }

    /// Add the rating threshold if absent, remove it otherwise
    pub fn toggle_rating(&mut self, rating: f64) {
        if let Some(pos) = self.ratings.iter().position(|r| *r == rating) {
            self.ratings.remove(pos);
        } else {
            self.ratings.push(rating);
        }
    }

    /// Select a distance limit; selecting the active one clears the limit
    pub fn toggle_distance(&mut self, max_distance: f64) {
        self.max_distance = if self.max_distance == max_distance {
            0.0
        } else {
            max_distance
        };
    }
}
