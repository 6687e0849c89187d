//! Configuration service implementation.
//!
//! Loads `RegistryConfig` from `config.toml`, creating the file with defaults
//! when it is missing.

use crate::paths::SessionStorePaths;
use sessionstore_core::config::{ConfigRepository, RegistryConfig};
use sessionstore_core::error::{Result, SessionStoreError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Configuration service that loads and caches the registry configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RegistryConfig>>>,
}

impl ConfigService {
    /// Creates a service for the platform default config file.
    ///
    /// # Errors
    ///
    /// Returns a config error if the platform config directory is unknown.
    pub fn new() -> Result<Self> {
        let path = SessionStorePaths::config_file()
            .map_err(|e| SessionStoreError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service for an explicit config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RegistryConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_or_create()?;

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_or_create(&self) -> Result<RegistryConfig> {
        if !self.path.exists() {
            let config = RegistryConfig::default();
            self.write_file(&config)?;
            tracing::info!(path = %self.path.display(), "Created default config file");
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RegistryConfig::default());
        }

        RegistryConfig::from_toml_str(&content).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Invalid config file");
            e
        })
    }

    /// Writes via a temporary file and rename so readers never see a partial file.
    fn write_file(&self, config: &RegistryConfig) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let text = config.to_toml_string()?;
        let tmp_path = self.path.with_extension("toml.tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(text.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl ConfigRepository for ConfigService {
    fn load(&self) -> Result<RegistryConfig> {
        self.get_config()
    }

    fn save(&self, config: &RegistryConfig) -> Result<()> {
        config.validate()?;
        self.write_file(config)?;

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(config.clone());
        Ok(())
    }
}
