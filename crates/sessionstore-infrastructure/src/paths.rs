//! Path management for sessionstore configuration files.
//!
//! ```text
//! ~/.config/sessionstore/     # Config directory (platform config dir)
//! └── config.toml             # Registry configuration
//! ```

use std::path::PathBuf;

/// Name of the per-application directory under the platform config dir.
pub const APP_DIR_NAME: &str = "sessionstore";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find platform config directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct SessionStorePaths;

impl SessionStorePaths {
    /// Returns the sessionstore configuration directory.
    ///
    /// - Linux: `~/.config/sessionstore/`
    /// - macOS: `~/Library/Application Support/sessionstore/`
    /// - Windows: `%APPDATA%\sessionstore\`
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_inside_config_dir() {
        if let (Ok(dir), Ok(file)) = (
            SessionStorePaths::config_dir(),
            SessionStorePaths::config_file(),
        ) {
            assert!(dir.ends_with(APP_DIR_NAME));
            assert_eq!(file.parent(), Some(dir.as_path()));
        }
    }
}
