use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::models::{generate_place_id, Coordinates, Place, Resolution, UNNAMED_PLACE};
use crate::services::provider::{
    decode_json, decode_records, http_client, lenient, valid_coordinates, PlaceProvider,
    ProviderError,
};

const RESOLVE_FIELD_MASK: &str = "places.id,places.location";
const NEARBY_FIELD_MASK: &str =
    "places.id,places.displayName,places.rating,places.location,places.photos,places.types";

/// Client for the JSON places API
///
/// Requests are POSTed with the API key in `X-Goog-Api-Key` and a field mask
/// restricting the response to what the mapping below reads.
pub struct StructuredPlacesClient {
    base_url: String,
    api_key: String,
    photo_max_width: u32,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    // Decoded record by record, see `decode_records`
    places: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct WirePlace {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(rename = "displayName", default, deserialize_with = "lenient")]
    display_name: Option<LocalizedText>,
    #[serde(default, deserialize_with = "lenient")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    location: Option<LatLng>,
    #[serde(default, deserialize_with = "lenient")]
    photos: Option<Vec<WirePhoto>>,
    #[serde(default, deserialize_with = "lenient")]
    types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    #[serde(default, deserialize_with = "lenient")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    name: Option<String>,
}

impl WirePlace {
    fn coordinates(&self) -> Option<Coordinates> {
        let location = self.location.as_ref()?;
        valid_coordinates(location.latitude, location.longitude)
    }
}

impl StructuredPlacesClient {
    /// Create a new client
    pub fn new(
        base_url: String,
        api_key: String,
        photo_max_width: u32,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url,
            api_key,
            photo_max_width,
            client: http_client(timeout)?,
        })
    }

    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::new(
            settings.structured_base_url.clone(),
            settings.api_key.clone(),
            settings.photo_max_width,
            settings.request_timeout(),
        )
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/places:{}", self.base_url.trim_end_matches('/'), method)
    }

    /// Media URL for a photo resource name, carrying the API key
    fn photo_url(&self, photo_name: &str) -> String {
        format!(
            "{}/{}/media?maxWidthPx={}&key={}",
            self.base_url.trim_end_matches('/'),
            photo_name.trim_start_matches('/'),
            self.photo_max_width,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn post(
        &self,
        method: &str,
        field_mask: &str,
        body: serde_json::Value,
    ) -> Result<PlacesResponse, ProviderError> {
        let url = self.endpoint(method);

        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", field_mask)
            .json(&body)
            .send()
            .await?;

        decode_json(response, method).await
    }

    fn to_place(&self, wire: WirePlace) -> Option<Place> {
        let coordinates = wire.coordinates()?;

        let photo_url = wire
            .photos
            .as_ref()
            .and_then(|photos| photos.first())
            .and_then(|photo| photo.name.as_deref())
            .map(|name| self.photo_url(name));

        Some(Place {
            id: wire.id.unwrap_or_else(generate_place_id),
            name: wire
                .display_name
                .and_then(|n| n.text)
                .unwrap_or_else(|| UNNAMED_PLACE.to_string()),
            lat: coordinates.lat,
            lng: coordinates.lng,
            rating: wire.rating,
            distance: None,
            photo_url,
            types: wire.types.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl PlaceProvider for StructuredPlacesClient {
    fn name(&self) -> &str {
        "structured"
    }

    async fn resolve_query(&self, text: &str) -> Result<Option<Resolution>, ProviderError> {
        let response = self
            .post("searchText", RESOLVE_FIELD_MASK, json!({ "textQuery": text }))
            .await?;

        let Some(first) = response.places.and_then(|places| places.into_iter().next()) else {
            tracing::debug!("No candidates for query {:?}", text);
            return Ok(None);
        };

        let first: WirePlace = serde_json::from_value(first).map_err(|e| {
            ProviderError::InvalidResponse(format!("Malformed top candidate: {}", e))
        })?;

        let coordinates = first.coordinates().ok_or_else(|| {
            ProviderError::InvalidResponse("Top candidate has no valid location".into())
        })?;

        Ok(Some(Resolution::new(coordinates, first.id)))
    }

    async fn search_nearby(
        &self,
        center: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<Place>, ProviderError> {
        let body = json!({
            "locationRestriction": {
                "circle": {
                    "center": { "latitude": center.lat, "longitude": center.lng },
                    "radius": radius_meters,
                }
            }
        });

        let response = self.post("searchNearby", NEARBY_FIELD_MASK, body).await?;

        let places: Vec<Place> = decode_records::<WirePlace>(response.places)
            .into_iter()
            .filter_map(|wire| self.to_place(wire))
            .collect();

        tracing::debug!("Nearby search returned {} places", places.len());

        Ok(places)
    }
}
