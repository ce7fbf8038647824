use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::models::{generate_place_id, Coordinates, Place, Resolution, UNNAMED_PLACE};
use crate::services::provider::{
    decode_json, decode_records, http_client, lenient, valid_coordinates, PlaceProvider,
    ProviderError,
};

/// Client for the query-string places API
///
/// Every call is a GET with URL-encoded parameters and the API key passed as
/// the `key` parameter. Responses share a `{status, results}` envelope.
pub struct LegacyPlacesClient {
    base_url: String,
    api_key: String,
    photo_max_width: u32,
    client: Client,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub status: Option<String>,
    pub error_message: Option<String>,
}

impl Envelope {
    /// `OK` and `ZERO_RESULTS` are successes, anything else is an API error
    pub(crate) fn check(&self, operation: &str) -> Result<(), ProviderError> {
        match self.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => Ok(()),
            Some(status) => Err(ProviderError::ApiError(format!(
                "{} returned {}: {}",
                operation,
                status,
                self.error_message.as_deref().unwrap_or("no message")
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(flatten)]
    envelope: Envelope,
    // Decoded record by record, see `decode_records`
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct LegacyPlace {
    #[serde(default, deserialize_with = "lenient")]
    place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient")]
    photos: Option<Vec<LegacyPhoto>>,
    #[serde(default, deserialize_with = "lenient")]
    types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    #[serde(default, deserialize_with = "lenient")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LegacyPhoto {
    photo_reference: Option<String>,
}

impl LegacyPlace {
    fn coordinates(&self) -> Option<Coordinates> {
        let location = self.geometry.as_ref()?.location.as_ref()?;
        valid_coordinates(location.lat, location.lng)
    }
}

impl LegacyPlacesClient {
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
            settings.legacy_base_url.clone(),
            settings.api_key.clone(),
            settings.photo_max_width,
            settings.request_timeout(),
        )
    }

    /// Build `{base}/{path}?{params}&key={api_key}` with every value encoded
    fn url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .chain(std::iter::once(&("key", self.api_key.as_str())))
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/{}?{}", self.base_url.trim_end_matches('/'), path, query)
    }

    fn photo_url(&self, reference: &str) -> String {
        let max_width = self.photo_max_width.to_string();
        self.url(
            "photo",
            &[("maxwidth", max_width.as_str()), ("photo_reference", reference)],
        )
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<SearchResponse, ProviderError> {
        let url = self.url(path, params);

        tracing::debug!("GET {}/{}", self.base_url.trim_end_matches('/'), path);

        let response = self.client.get(&url).send().await?;
        let body: SearchResponse = decode_json(response, path).await?;
        body.envelope.check(path)?;

        Ok(body)
    }

    fn to_place(&self, legacy: LegacyPlace) -> Option<Place> {
        let coordinates = legacy.coordinates()?;

        let photo_url = legacy
            .photos
            .as_ref()
            .and_then(|photos| photos.first())
            .and_then(|photo| photo.photo_reference.as_deref())
            .map(|reference| self.photo_url(reference));

        Some(Place {
            id: legacy.place_id.unwrap_or_else(generate_place_id),
            name: legacy.name.unwrap_or_else(|| UNNAMED_PLACE.to_string()),
            lat: coordinates.lat,
            lng: coordinates.lng,
            rating: legacy.rating,
            distance: None,
            photo_url,
            types: legacy.types.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl PlaceProvider for LegacyPlacesClient {
    fn name(&self) -> &str {
        "legacy"
    }

    async fn resolve_query(&self, text: &str) -> Result<Option<Resolution>, ProviderError> {
        let response = self.get("textsearch/json", &[("query", text)]).await?;

        let Some(first) = response.results.and_then(|results| results.into_iter().next()) else {
            tracing::debug!("No candidates for query {:?}", text);
            return Ok(None);
        };

        let first: LegacyPlace = serde_json::from_value(first).map_err(|e| {
            ProviderError::InvalidResponse(format!("Malformed top candidate: {}", e))
        })?;

        let coordinates = first.coordinates().ok_or_else(|| {
            ProviderError::InvalidResponse("Top candidate has no valid location".into())
        })?;

        Ok(Some(Resolution::new(coordinates, first.place_id)))
    }

    async fn search_nearby(
        &self,
        center: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<Place>, ProviderError> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_meters.to_string();

        let response = self
            .get(
                "nearbysearch/json",
                &[("location", location.as_str()), ("radius", radius.as_str())],
            )
            .await?;

        let places: Vec<Place> = decode_records::<LegacyPlace>(response.results)
            .into_iter()
            .filter_map(|legacy| self.to_place(legacy))
            .collect();

        tracing::debug!("Nearby search returned {} places", places.len());

        Ok(places)
    }
}
