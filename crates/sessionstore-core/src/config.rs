//! Registry configuration model and its repository trait.

use crate::error::{Result, SessionStoreError};
use crate::state::SliceName;
use serde::{Deserialize, Serialize};

/// Entries idle longer than this are swept (30 minutes).
pub const DEFAULT_MAX_AGE_MS: i64 = 30 * 60 * 1000;
/// Entries touched within this window count as active (5 minutes).
pub const DEFAULT_ACTIVE_WINDOW_MS: i64 = 5 * 60 * 1000;
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 60;

fn default_max_age_ms() -> i64 {
    DEFAULT_MAX_AGE_MS
}

fn default_active_window_ms() -> i64 {
    DEFAULT_ACTIVE_WINDOW_MS
}

fn default_maintenance_interval_secs() -> u64 {
    DEFAULT_MAINTENANCE_INTERVAL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Tuning knobs for a `SessionRegistry`.
///
/// Every field has a default, so a partial `config.toml` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Idle time after which an entry is evicted by a sweep
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: i64,

    /// Recency window used by diagnostics to count an entry as active
    #[serde(default = "default_active_window_ms")]
    pub active_window_ms: i64,

    /// Slices included in the server-to-client payload
    #[serde(default = "SliceName::default_hydrated")]
    pub hydrated_slices: Vec<SliceName>,

    /// Tick interval of the background maintenance task
    #[serde(default = "default_maintenance_interval_secs")]
    pub maintenance_interval_secs: u64,

    /// Fallback log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_age_ms: DEFAULT_MAX_AGE_MS,
            active_window_ms: DEFAULT_ACTIVE_WINDOW_MS,
            hydrated_slices: SliceName::default_hydrated(),
            maintenance_interval_secs: DEFAULT_MAINTENANCE_INTERVAL_SECS,
            log_level: default_log_level(),
        }
    }
}

impl RegistryConfig {
    /// Checks that every duration is positive.
    pub fn validate(&self) -> Result<()> {
        if self.max_age_ms <= 0 {
            return Err(SessionStoreError::config(format!(
                "max_age_ms must be positive, got {}",
                self.max_age_ms
            )));
        }
        if self.active_window_ms <= 0 {
            return Err(SessionStoreError::config(format!(
                "active_window_ms must be positive, got {}",
                self.active_window_ms
            )));
        }
        if self.maintenance_interval_secs == 0 {
            return Err(SessionStoreError::config(
                "maintenance_interval_secs must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Storage backend for `RegistryConfig`.
pub trait ConfigRepository: Send + Sync {
    /// Loads the configuration, falling back to defaults when none is stored.
    fn load(&self) -> Result<RegistryConfig>;

    fn save(&self, config: &RegistryConfig) -> Result<()>;
}
