use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line, human oriented
    Pretty,
    /// Default single-line text
    Full,
}

impl LogFormat {
    /// Unknown names fall back to the single-line text format
    pub fn from_setting(format: &str) -> Self {
        match format {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Full,
        }
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. A subscriber that
/// is already installed (by the host application or an earlier call) is left
/// alone.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let result = match LogFormat::from_setting(&settings.format) {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Pretty => subscriber.pretty().try_init(),
        LogFormat::Full => subscriber.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
