// Service exports
pub mod legacy;
pub mod provider;
pub mod reviews;
pub mod structured;

pub use legacy::LegacyPlacesClient;
pub use provider::{PlaceProvider, ProviderError, DEFAULT_RADIUS_METERS};
pub use reviews::{ReviewFetcher, DEFAULT_REVIEW_LIMIT, NO_REVIEWS_MESSAGE, REVIEWS_ERROR_MESSAGE};
pub use structured::StructuredPlacesClient;

use crate::config::{ProviderKind, ProviderSettings};
use std::sync::Arc;

/// Build the provider variant selected in the settings
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn PlaceProvider>, ProviderError> {
    let provider: Arc<dyn PlaceProvider> = match settings.kind {
        ProviderKind::Structured => Arc::new(StructuredPlacesClient::from_settings(settings)?),
        ProviderKind::Legacy => Arc::new(LegacyPlacesClient::from_settings(settings)?),
    };

    tracing::info!("Using {} places provider", provider.name());

    Ok(provider)
}
