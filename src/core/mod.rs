// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod search;

pub use distance::{haversine_distance, sort_by_distance};
pub use filters::{apply_filters, matches_distance, matches_rating, matches_type};
pub use search::{SearchAggregator, SearchOutcome, SearchStatus, DEFAULT_FALLBACK};
