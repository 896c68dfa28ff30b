//! Subscriber setup for the `tracing` events emitted by casts, LOB storage
//! and LOB comparison.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Environment variable that overrides the configured level
pub const LOG_ENV: &str = "TYPELAYER_LOG";

/// Installs a global fmt subscriber. Only the first call in a process takes
/// effect; later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| config.level.clone());
    let filter = || EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let base = || tracing_subscriber::fmt().with_env_filter(filter()).with_target(true);

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = match config.format {
        LogFormat::Json => Box::new(base().json().finish()),
        LogFormat::Text => Box::new(base().compact().finish()),
    };

    let _ = tracing::subscriber::set_global_default(subscriber);
}
