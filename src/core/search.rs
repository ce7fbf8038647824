use std::sync::Arc;

use crate::config::SearchSettings;
use crate::core::distance::{haversine_distance, sort_by_distance};
use crate::models::{Coordinates, Place};
use crate::services::provider::report_failure;
use crate::services::{PlaceProvider, ProviderError, DEFAULT_RADIUS_METERS};

/// Location used when a query cannot be resolved (Penang)
pub const DEFAULT_FALLBACK: Coordinates = Coordinates {
    lat: 5.4164,
    lng: 100.3327,
};

/// How a search produced its places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Blank query, no request was made
    EmptyQuery,
    /// Query resolved; places start with the exact-match entry
    Resolved,
    /// Query did not resolve; places are the raw fallback neighbourhood
    Fallback,
}

/// Result of a search together with the failures swallowed on the way
#[derive(Debug)]
pub struct SearchOutcome {
    pub places: Vec<Place>,
    pub status: SearchStatus,
    pub errors: Vec<ProviderError>,
}

impl SearchOutcome {
    fn empty_query() -> Self {
        Self {
            places: Vec::new(),
            status: SearchStatus::EmptyQuery,
            errors: Vec::new(),
        }
    }

    /// True when a provider call failed, as opposed to merely finding nothing
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Place search orchestrator
///
/// # Pipeline
/// 1. Resolve the query to a coordinate
/// 2. Fetch nearby places around it
/// 3. Attach distances and sort ascending
/// 4. Prepend the exact-match entry
///
/// When resolution misses or fails, the nearby places of the fallback
/// coordinate are returned as they came.
#[derive(Clone)]
pub struct SearchAggregator {
    provider: Arc<dyn PlaceProvider>,
    fallback: Coordinates,
    radius_meters: u32,
}

impl SearchAggregator {
    pub fn new(provider: Arc<dyn PlaceProvider>) -> Self {
        Self {
            provider,
            fallback: DEFAULT_FALLBACK,
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }

    pub fn from_settings(provider: Arc<dyn PlaceProvider>, settings: &SearchSettings) -> Self {
        Self {
            provider,
            fallback: settings.fallback(),
            radius_meters: settings.radius_meters,
        }
    }

    pub fn with_fallback(mut self, fallback: Coordinates) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn fallback(&self) -> Coordinates {
        self.fallback
    }

    /// Search places for a free-text query
    ///
    /// Never fails: every failure degrades to fewer (possibly zero) places.
    /// Use [`search_with_outcome`](Self::search_with_outcome) to tell an empty
    /// answer from a failed request.
    pub async fn search(&self, query: &str) -> Vec<Place> {
        self.search_with_outcome(query).await.places
    }

    pub async fn search_with_outcome(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::empty_query();
        }

        let mut errors = Vec::new();

        let resolution = match self.provider.resolve_query(query).await {
            Ok(resolution) => resolution,
            Err(e) => {
                report_failure(self.provider.name(), "resolve_query", &e);
                errors.push(e);
                None
            }
        };

        let Some(resolution) = resolution else {
            tracing::warn!("No exact match for {:?}, showing fallback nearby places", query);
            let places = self.nearby(self.fallback, &mut errors).await;
            return SearchOutcome {
                places,
                status: SearchStatus::Fallback,
                errors,
            };
        };

        let origin = resolution.coordinates;
        let mut nearby = self.nearby(origin, &mut errors).await;

        for place in &mut nearby {
            let coordinates = place.coordinates();
            // Providers already drop these; tolerate them anyway
            if coordinates.is_valid() {
                place.distance = Some(haversine_distance(origin, coordinates));
            }
        }

        sort_by_distance(&mut nearby);

        let mut places = Vec::with_capacity(nearby.len() + 1);
        places.push(Place::exact_match(query, &resolution));
        places.extend(nearby);

        tracing::debug!("Search for {:?} produced {} places", query, places.len());

        SearchOutcome {
            places,
            status: SearchStatus::Resolved,
            errors,
        }
    }

    async fn nearby(&self, center: Coordinates, errors: &mut Vec<ProviderError>) -> Vec<Place> {
        match self.provider.search_nearby(center, self.radius_meters).await {
            Ok(places) => places,
            Err(e) => {
                report_failure(self.provider.name(), "search_nearby", &e);
                errors.push(e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resolution;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        resolution: Option<Resolution>,
        nearby: Vec<Place>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlaceProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn resolve_query(&self, _text: &str) -> Result<Option<Resolution>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.resolution.clone())
        }

        async fn search_nearby(
            &self,
            _center: Coordinates,
            _radius_meters: u32,
        ) -> Result<Vec<Place>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.nearby.clone())
        }
    }

    fn create_test_place(id: &str, lat: f64, lng: f64) -> Place {
        Place {
            id: id.to_string(),
            name: id.to_string(),
            lat,
            lng,
            rating: None,
            distance: None,
            photo_url: None,
            types: vec![],
        }
    }

    #[test]
    fn test_blank_query_makes_no_calls() {
        let provider = Arc::new(FixedProvider {
            resolution: None,
            nearby: vec![],
            calls: AtomicUsize::new(0),
        });
        let aggregator = SearchAggregator::new(provider.clone());

        let outcome = tokio_test::block_on(aggregator.search_with_outcome("   "));

        assert!(outcome.places.is_empty());
        assert_eq!(outcome.status, SearchStatus::EmptyQuery);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_coordinates_pass_through_without_distance() {
        let provider = Arc::new(FixedProvider {
            resolution: Some(Resolution::new(Coordinates::new(0.0, 0.0), None)),
            nearby: vec![
                create_test_place("far", 0.0, 0.05),
                create_test_place("broken", f64::NAN, 0.0),
                create_test_place("near", 0.0, 0.01),
            ],
            calls: AtomicUsize::new(0),
        });
        let aggregator = SearchAggregator::new(provider);

        let places = aggregator.search("origin").await;

        let ids: Vec<&str> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "broken", "near", "far"]);
        assert!(places[1].distance.is_none());
    }
}
