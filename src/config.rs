use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

use crate::models::Coordinates;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Library configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub provider: ProviderSettings,
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchSettings,
    #[serde(default)]
    #[validate(nested)]
    pub reviews: ReviewSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which upstream API style backs the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// JSON POST API, key sent as a header
    #[default]
    Structured,
    /// Query-string GET API, key sent as a parameter
    Legacy,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    #[validate(length(min = 1))]
    pub api_key: String,
    #[serde(default = "default_structured_base_url")]
    #[validate(length(min = 1))]
    pub structured_base_url: String,
    #[serde(default = "default_legacy_base_url")]
    #[validate(length(min = 1))]
    pub legacy_base_url: String,
    #[serde(default = "default_photo_max_width")]
    #[validate(range(min = 1, max = 4800))]
    pub photo_max_width: u32,
    pub request_timeout_secs: Option<u64>,
}

impl ProviderSettings {
    /// Transport timeout, `None` leaves the client default in place
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchSettings {
    #[serde(default = "default_radius_meters")]
    #[validate(range(min = 1, max = 50000))]
    pub radius_meters: u32,
    #[serde(default = "default_fallback_lat")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub fallback_lat: f64,
    #[serde(default = "default_fallback_lng")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub fallback_lng: f64,
}

impl SearchSettings {
    pub fn fallback(&self) -> Coordinates {
        Coordinates::new(self.fallback_lat, self.fallback_lng)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
            fallback_lat: default_fallback_lat(),
            fallback_lng: default_fallback_lng(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewSettings {
    #[serde(default = "default_review_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: usize,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            limit: default_review_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_structured_base_url() -> String { "https://places.googleapis.com/v1".to_string() }
fn default_legacy_base_url() -> String { "https://maps.googleapis.com/maps/api/place".to_string() }
fn default_photo_max_width() -> u32 { 400 }
fn default_radius_meters() -> u32 { 3000 }
// Penang
fn default_fallback_lat() -> f64 { 5.4164 }
fn default_fallback_lng() -> f64 { 100.3327 }
fn default_review_limit() -> usize { 5 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PLACES, e.g. PLACES__PROVIDER__KIND)
    /// 5. PLACES_API_KEY or GOOGLE_MAPS_API_KEY for the provider key
    pub fn load() -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?;

        let settings = substitute_api_key(settings, api_key_from_env())?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    ///
    /// Environment overrides apply as in [`Settings::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        Self::load_path(path.as_ref(), api_key_from_env())
    }

    fn load_path(path: &Path, api_key: Option<String>) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(env_source())
            .build()?;

        let settings = substitute_api_key(settings, api_key)?;

        Self::finish(settings)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(toml: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, SettingsError> {
        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

fn env_source() -> Environment {
    // e.g., PLACES__SEARCH__RADIUS_METERS -> search.radius_meters
    Environment::with_prefix("PLACES")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// API key from the conventional plain variables, if set
fn api_key_from_env() -> Option<String> {
    use std::env;

    env::var("PLACES_API_KEY")
        .or_else(|_| env::var("GOOGLE_MAPS_API_KEY"))
        .ok()
}

/// Override the provider key when one was found outside the config files
fn substitute_api_key(settings: Config, api_key: Option<String>) -> Result<Config, ConfigError> {
    match api_key {
        Some(key) => Config::builder()
            .add_source(settings)
            .set_override("provider.api_key", key)?
            .build(),
        None => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let settings = Settings::from_toml(
            r#"
            [provider]
            api_key = "test_key"
            "#,
        )
        .unwrap();

        assert_eq!(settings.provider.kind, ProviderKind::Structured);
        assert_eq!(settings.provider.photo_max_width, 400);
        assert!(settings.provider.request_timeout().is_none());
        assert_eq!(settings.search.radius_meters, 3000);
        assert_eq!(settings.search.fallback(), Coordinates::new(5.4164, 100.3327));
        assert_eq!(settings.reviews.limit, 5);
    }

    #[test]
    fn test_legacy_kind_and_timeout() {
        let settings = Settings::from_toml(
            r#"
            [provider]
            kind = "legacy"
            api_key = "test_key"
            request_timeout_secs = 10

            [search]
            radius_meters = 1500
            "#,
        )
        .unwrap();

        assert_eq!(settings.provider.kind, ProviderKind::Legacy);
        assert_eq!(settings.provider.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(settings.search.radius_meters, 1500);
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = Settings::from_toml(
            r#"
            [provider]
            api_key = ""
            "#,
        );

        assert!(matches!(result, Err(SettingsError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_radius_is_rejected() {
        let result = Settings::from_toml(
            r#"
            [provider]
            api_key = "k"

            [search]
            radius_meters = 0
            "#,
        );

        assert!(matches!(result, Err(SettingsError::Validation(_))));
    }

    #[test]
    fn test_load_from_applies_api_key_override() {
        let path = std::env::temp_dir().join(format!("place-finder-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [provider]
            api_key = "file_key"

            [search]
            radius_meters = 2000
            "#,
        )
        .unwrap();

        let overridden = Settings::load_path(&path, Some("env_key".to_string()));
        let from_file = Settings::load_path(&path, None);
        std::fs::remove_file(&path).ok();

        let overridden = overridden.unwrap();
        assert_eq!(overridden.provider.api_key, "env_key");
        assert_eq!(overridden.search.radius_meters, 2000);
        assert_eq!(from_file.unwrap().provider.api_key, "file_key");
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
