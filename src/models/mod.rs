// Model exports
pub mod domain;
pub mod filter_spec;

pub use domain::{generate_place_id, Coordinates, Place, Resolution, EXACT_MATCH_ID, UNNAMED_PLACE};
pub use filter_spec::{FilterSpec, DISTANCE_OPTIONS_KM, PLACE_TYPES, STAR_RATINGS};
