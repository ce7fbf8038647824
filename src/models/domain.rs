use serde::{Deserialize, Serialize};

/// Id carried by the exact-match entry when the provider did not report one
pub const EXACT_MATCH_ID: &str = "exact";

/// Display name used when the provider omits one
pub const UNNAMED_PLACE: &str = "Unnamed place";

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside the WGS84 range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= 90.0
            && self.lng.abs() <= 180.0
    }
}

/// Successful resolution of a text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub coordinates: Coordinates,
    #[serde(rename = "placeId", default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Resolution {
    pub fn new(coordinates: Coordinates, place_id: Option<String>) -> Self {
        Self {
            coordinates,
            place_id,
        }
    }
}

/// A discovered point of interest
///
/// Places are built fresh for every search. Apart from `distance`, which the
/// aggregator attaches, nothing mutates them after the provider mapped them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Kilometers from the resolved query coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(rename = "photoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl Place {
    /// Build the synthetic entry standing for the query's own location.
    ///
    /// Its id is the resolved place id when the provider reported one, and
    /// [`EXACT_MATCH_ID`] otherwise. The sentinel is deliberate: callers key
    /// selection state on it.
    pub fn exact_match(query: &str, resolution: &Resolution) -> Self {
        Self {
            id: resolution
                .place_id
                .clone()
                .unwrap_or_else(|| EXACT_MATCH_ID.to_string()),
            name: query.to_string(),
            lat: resolution.coordinates.lat,
            lng: resolution.coordinates.lng,
            rating: None,
            distance: Some(0.0),
            photo_url: None,
            types: Vec::new(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Distance used for ordering, unset counts as zero
    #[inline]
    pub fn distance_or_zero(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }
}

/// Locally unique id for places the provider returned without one
pub fn generate_place_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
