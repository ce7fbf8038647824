use std::sync::Arc;

use crate::config::Settings;
use crate::core::{apply_filters, SearchAggregator, SearchOutcome};
use crate::models::{FilterSpec, Place};
use crate::services::{build_provider, PlaceProvider, ProviderError, ReviewFetcher};

/// Entry point for the display layer
///
/// Bundles the configured provider, the search pipeline and the review
/// fetcher. Cheap to share: holds no per-call state.
pub struct PlaceFinder {
    aggregator: SearchAggregator,
    reviews: ReviewFetcher,
}

impl PlaceFinder {
    pub fn new(aggregator: SearchAggregator, reviews: ReviewFetcher) -> Self {
        Self { aggregator, reviews }
    }

    /// Wire the provider variant and fetchers named in the settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let provider: Arc<dyn PlaceProvider> = build_provider(&settings.provider)?;
        let aggregator = SearchAggregator::from_settings(provider, &settings.search);
        let reviews = ReviewFetcher::from_settings(&settings.provider, &settings.reviews)?;

        Ok(Self::new(aggregator, reviews))
    }

    pub async fn search(&self, query: &str) -> Vec<Place> {
        self.aggregator.search(query).await
    }

    pub async fn search_with_outcome(&self, query: &str) -> SearchOutcome {
        self.aggregator.search_with_outcome(query).await
    }

    /// Search and filter in one step, as the result list shows it
    pub async fn search_filtered(&self, query: &str, spec: &FilterSpec) -> Vec<Place> {
        let places = self.search(query).await;
        apply_filters(&places, spec)
    }

    pub fn apply(&self, places: &[Place], spec: &FilterSpec) -> Vec<Place> {
        apply_filters(places, spec)
    }

    pub async fn fetch_reviews(&self, place_id: &str) -> Vec<String> {
        self.reviews.fetch_reviews(place_id).await
    }
}
