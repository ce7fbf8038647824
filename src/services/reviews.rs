use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{ProviderSettings, ReviewSettings};
use crate::models::EXACT_MATCH_ID;
use crate::services::legacy::Envelope;
use crate::services::provider::{decode_json, decode_records, http_client, lenient, ProviderError};

/// Returned when the place has no reviews
pub const NO_REVIEWS_MESSAGE: &str = "No reviews found.";

/// Returned when the reviews could not be fetched
pub const REVIEWS_ERROR_MESSAGE: &str = "Error fetching reviews.";

/// Number of reviews kept per place
pub const DEFAULT_REVIEW_LIMIT: usize = 5;

/// Fetches review snippets from the place details endpoint
pub struct ReviewFetcher {
    base_url: String,
    api_key: String,
    limit: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(flatten)]
    envelope: Envelope,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    reviews: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Review {
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
}

impl ReviewFetcher {
    /// Create a new fetcher against the query-string details endpoint
    pub fn new(
        base_url: String,
        api_key: String,
        limit: usize,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url,
            api_key,
            limit,
            client: http_client(timeout)?,
        })
    }

    pub fn from_settings(
        provider: &ProviderSettings,
        reviews: &ReviewSettings,
    ) -> Result<Self, ProviderError> {
        Self::new(
            provider.legacy_base_url.clone(),
            provider.api_key.clone(),
            reviews.limit,
            provider.request_timeout(),
        )
    }

    /// Review texts for a place, never failing
    ///
    /// Yields `["No reviews found."]` when the place has none and
    /// `["Error fetching reviews."]` when the request failed.
    pub async fn fetch_reviews(&self, place_id: &str) -> Vec<String> {
        match self.try_fetch_reviews(place_id).await {
            Ok(reviews) if reviews.is_empty() => vec![NO_REVIEWS_MESSAGE.to_string()],
            Ok(reviews) => reviews,
            Err(e) => {
                tracing::error!("Failed to fetch reviews for {}: {}", place_id, e);
                vec![REVIEWS_ERROR_MESSAGE.to_string()]
            }
        }
    }

    /// Review texts in upstream order, at most `limit` of them
    ///
    /// An empty vector means the place has no reviews. The synthetic
    /// exact-match id has none and is answered without a request.
    pub async fn try_fetch_reviews(&self, place_id: &str) -> Result<Vec<String>, ProviderError> {
        if place_id == EXACT_MATCH_ID {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/details/json?place_id={}&fields=review&key={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(place_id),
            urlencoding::encode(&self.api_key)
        );

        tracing::debug!("Fetching reviews for place: {}", place_id);

        let response = self.client.get(&url).send().await?;
        let details: DetailsResponse = decode_json(response, "details/json").await?;
        details.envelope.check("details/json")?;

        let reviews: Vec<String> = decode_records::<Review>(details.result.and_then(|r| r.reviews))
            .into_iter()
            .take(self.limit)
            .map(|review| review.text.unwrap_or_default())
            .collect();

        tracing::debug!("Fetched {} reviews for {}", reviews.len(), place_id);

        Ok(reviews)
    }
}
