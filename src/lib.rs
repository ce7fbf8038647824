//! Place Finder - attraction search and discovery client
//!
//! This library resolves a free-text query to a location, fetches nearby
//! points of interest from a places backend, annotates them with distance and
//! filters them for display. Review snippets are fetched per place on demand.

pub mod config;
pub mod core;
pub mod finder;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{apply_filters, haversine_distance, SearchAggregator, SearchOutcome, SearchStatus};
pub use config::{ProviderKind, Settings, SettingsError};
pub use finder::PlaceFinder;
pub use models::{Coordinates, FilterSpec, Place, Resolution};
pub use services::{build_provider, PlaceProvider, ProviderError, ReviewFetcher};
