//! Engine configuration
//!
//! All tunables live in one immutable `EngineConfig` handed to the scheduler
//! at construction time. Resolution priority follows the usual order:
//! CLI flag > environment variable (`RECONCILER_*`) > TOML file > compiled
//! default. A missing TOML file logs a warning and falls back to defaults;
//! it never terminates the run.

use crate::error::{Error, Result};
use crate::models::Category;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default batch size (subjects per batch)
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Default cooldown between storage probes (ms)
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;
/// Default cooldown between batches (ms)
pub const DEFAULT_BATCH_DELAY_MS: u64 = 2000;
/// Default retry attempts per operation
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default file-extension candidates, in precedence order
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Immutable engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Subjects per batch
    pub batch_size: usize,
    /// Cooldown between storage probes within a scan (ms)
    pub request_delay_ms: u64,
    /// Cooldown between batches (ms)
    pub batch_delay_ms: u64,
    /// Retry attempts per operation, including the first try
    pub max_attempts: u32,
    /// Backoff base for existence probes (ms)
    pub probe_backoff_ms: u64,
    /// Backoff base for download/upload steps (ms)
    pub transfer_backoff_ms: u64,
    /// Backoff base for whole-relocation retries (ms)
    pub relocate_backoff_ms: u64,
    /// Backoff base for record pointer writes (ms)
    pub pointer_backoff_ms: u64,
    /// File-extension candidates, in precedence order
    pub extensions: Vec<String>,
    /// Per-request HTTP timeout (seconds)
    pub http_timeout_secs: u64,
    /// Restrict the run to subjects of one account type
    pub account_filter: Option<Category>,
    /// Object store base URL
    pub storage_url: String,
    /// Object store API key
    pub storage_key: String,
    /// Record store database path
    pub database_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            probe_backoff_ms: 1000,
            transfer_backoff_ms: 1000,
            relocate_backoff_ms: 2000,
            pointer_backoff_ms: 1000,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            http_timeout_secs: 30,
            account_filter: None,
            storage_url: String::new(),
            storage_key: String::new(),
            database_path: "reconciler.db".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn probe_backoff(&self) -> Duration {
        Duration::from_millis(self.probe_backoff_ms)
    }

    pub fn transfer_backoff(&self) -> Duration {
        Duration::from_millis(self.transfer_backoff_ms)
    }

    pub fn relocate_backoff(&self) -> Duration {
        Duration::from_millis(self.relocate_backoff_ms)
    }

    pub fn pointer_backoff(&self) -> Duration {
        Duration::from_millis(self.pointer_backoff_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Apply the quick profile: larger batches, shorter cooldowns, a smaller
    /// retry budget. Useful for a fast survey of a mostly-healthy population.
    pub fn apply_quick_profile(&mut self) {
        self.batch_size = 15;
        self.request_delay_ms = 300;
        self.batch_delay_ms = 1500;
        self.max_attempts = 2;
    }

    /// Load configuration from a TOML file, then apply environment
    /// overrides. A missing file is a warning plus defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let file: FileConfig = toml::from_str(&content)
                        .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))?;
                    config.apply_file(file);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Config file not readable, using defaults"
                    );
                }
            }
        }

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        macro_rules! take {
            ($field:ident) => {
                if let Some(v) = file.$field {
                    self.$field = v;
                }
            };
        }
        take!(batch_size);
        take!(request_delay_ms);
        take!(batch_delay_ms);
        take!(max_attempts);
        take!(probe_backoff_ms);
        take!(transfer_backoff_ms);
        take!(relocate_backoff_ms);
        take!(pointer_backoff_ms);
        take!(extensions);
        take!(http_timeout_secs);
        take!(storage_url);
        take!(storage_key);
        take!(database_path);
    }

    fn apply_env(&mut self) {
        env_parse("RECONCILER_BATCH_SIZE", &mut self.batch_size);
        env_parse("RECONCILER_REQUEST_DELAY_MS", &mut self.request_delay_ms);
        env_parse("RECONCILER_BATCH_DELAY_MS", &mut self.batch_delay_ms);
        env_parse("RECONCILER_MAX_ATTEMPTS", &mut self.max_attempts);
        env_parse("RECONCILER_HTTP_TIMEOUT_SECS", &mut self.http_timeout_secs);
        env_parse("RECONCILER_STORAGE_URL", &mut self.storage_url);
        env_parse("RECONCILER_STORAGE_KEY", &mut self.storage_key);
        env_parse("RECONCILER_DATABASE_PATH", &mut self.database_path);
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        if self.extensions.is_empty() {
            return Err(Error::Config("extensions must not be empty".into()));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(v) => *slot = v,
            Err(_) => warn!(key, value = %raw, "Ignoring unparsable environment override"),
        }
    }
}

/// On-disk TOML schema: every key optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub batch_size: Option<usize>,
    pub request_delay_ms: Option<u64>,
    pub batch_delay_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub probe_backoff_ms: Option<u64>,
    pub transfer_backoff_ms: Option<u64>,
    pub relocate_backoff_ms: Option<u64>,
    pub pointer_backoff_ms: Option<u64>,
    pub extensions: Option<Vec<String>>,
    pub http_timeout_secs: Option<u64>,
    pub storage_url: Option<String>,
    pub storage_key: Option<String>,
    pub database_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.request_delay_ms, 500);
        assert_eq!(cfg.batch_delay_ms, 2000);
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.extensions, vec!["jpg", "jpeg", "png", "webp"]);
    }

    #[test]
    fn quick_profile_tightens_pacing() {
        let mut cfg = EngineConfig::default();
        cfg.apply_quick_profile();
        assert_eq!(cfg.batch_size, 15);
        assert_eq!(cfg.request_delay_ms, 300);
        assert_eq!(cfg.batch_delay_ms, 1500);
        assert_eq!(cfg.max_attempts, 2);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.batch_size = 0;
        assert!(cfg.validate().is_err());
    }
}
