use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Coordinates, Place, Resolution};

/// Radius of the nearby search in meters
pub const DEFAULT_RADIUS_METERS: u32 = 3000;

/// Errors that can occur when talking to a places backend
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Place search backend
///
/// The required methods keep "nothing found" (`Ok(None)`, `Ok(vec![])`)
/// apart from "request failed" (`Err`). The provided `*_or_*` methods fold
/// failures into those empty values for callers that only want the
/// degraded result.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Human-readable name of the provider
    fn name(&self) -> &str;

    /// Resolve a text query to the location of its best candidate
    async fn resolve_query(&self, text: &str) -> Result<Option<Resolution>, ProviderError>;

    /// Fetch places around `center`, dropping records without coordinates
    async fn search_nearby(
        &self,
        center: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<Place>, ProviderError>;

    /// Resolve a query, logging failures and mapping them to `None`
    async fn resolve_or_none(&self, text: &str) -> Option<Resolution> {
        match self.resolve_query(text).await {
            Ok(resolution) => resolution,
            Err(e) => {
                report_failure(self.name(), "resolve_query", &e);
                None
            }
        }
    }

    /// Search nearby, logging failures and mapping them to an empty list
    async fn nearby_or_empty(&self, center: Coordinates, radius_meters: u32) -> Vec<Place> {
        match self.search_nearby(center, radius_meters).await {
            Ok(places) => places,
            Err(e) => {
                report_failure(self.name(), "search_nearby", &e);
                Vec::new()
            }
        }
    }
}

/// Log a provider failure that is being degraded to an empty value
pub(crate) fn report_failure(provider: &str, operation: &str, error: &ProviderError) {
    tracing::error!(provider, "{} failed: {}", operation, error);
}

/// Build the HTTP client shared by a provider's requests
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<Client, ProviderError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Check the status and decode the JSON body of an upstream response
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    operation: &str,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("{} failed: {} - {}", operation, status, body);
        return Err(ProviderError::ApiError(format!("{} failed: {}", operation, status)));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse {} response: {}", operation, e))
    })
}

/// Coordinates from optional upstream fields, `None` unless both are valid
pub(crate) fn valid_coordinates(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinates> {
    let coordinates = Coordinates::new(lat?, lng?);
    coordinates.is_valid().then_some(coordinates)
}

/// Decode records one at a time, dropping the ones that do not fit `T`
///
/// A `null` entry or a record with a mistyped required field only costs that
/// record, not the page.
pub(crate) fn decode_records<T: DeserializeOwned>(records: Option<Vec<Value>>) -> Vec<T> {
    let records = records.unwrap_or_default();
    let total = records.len();

    let decoded: Vec<T> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::warn!("Dropped {} of {} malformed records", total - decoded.len(), total);
    }

    decoded
}

/// Optional field that reads a value of the wrong shape as unset
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
