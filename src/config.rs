//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (TYPELAYER_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [lob]
//! inline_threshold = 256
//! compare_chunk_size = 4096
//! spool_dir = "./data/lobs"
//!
//! [temporal]
//! time_zone = "Europe/Berlin"
//!
//! [collation]
//! mode = "case_insensitive"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! TYPELAYER_LOB__SPOOL_DIR=/tmp/lobs
//! TYPELAYER_TEMPORAL__TIME_ZONE=+02:00
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::context::{Collation, ValueContext, DEFAULT_LOB_CHUNK_SIZE, DEFAULT_LOB_INLINE_THRESHOLD};
use crate::error::ValueResult;
use crate::storage::FileLobStore;
use crate::temporal::ZoneSpec;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lob: LobConfig,
    #[serde(default)]
    pub temporal: TemporalConfig,
    #[serde(default)]
    pub collation: CollationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Large object handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobConfig {
    /// Content up to this many bytes is kept in memory
    #[serde(default = "default_inline_threshold")]
    pub inline_threshold: usize,

    /// Bytes read per operand in one step of a LOB comparison
    #[serde(default = "default_compare_chunk_size")]
    pub compare_chunk_size: usize,

    /// Directory for spooled LOB files
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalConfig {
    /// Zone for zone-less values: `UTC`, a fixed offset or a region name
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollationConfig {
    #[serde(default)]
    pub mode: Collation,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or an `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

fn default_inline_threshold() -> usize {
    DEFAULT_LOB_INLINE_THRESHOLD
}
fn default_compare_chunk_size() -> usize {
    DEFAULT_LOB_CHUNK_SIZE
}
fn default_spool_dir() -> PathBuf {
    PathBuf::from("./data/lobs")
}
fn default_time_zone() -> String {
    "UTC".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (TYPELAYER_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("TYPELAYER_").split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TYPELAYER_").split("__"))
            .extract()
    }

    /// Value context with the configured zone, collation and LOB chunking
    pub fn context(&self) -> ValueResult<ValueContext> {
        let zone = ZoneSpec::parse(&self.temporal.time_zone)?;
        Ok(ValueContext::new()
            .with_time_zone(zone)
            .with_collation(self.collation.mode)
            .with_lob_chunk_size(self.lob.compare_chunk_size))
    }

    /// File spooling store over the configured directory
    pub fn lob_store(&self) -> ValueResult<FileLobStore> {
        FileLobStore::new(self.lob.spool_dir.clone(), self.lob.inline_threshold)
    }
}

impl Default for LobConfig {
    fn default() -> Self {
        LobConfig {
            inline_threshold: default_inline_threshold(),
            compare_chunk_size: default_compare_chunk_size(),
            spool_dir: default_spool_dir(),
        }
    }
}

impl Default for TemporalConfig {
    fn default() -> Self {
        TemporalConfig {
            time_zone: default_time_zone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}
