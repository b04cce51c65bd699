//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tagtree::{TagTreeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TagTreeError {
    fn from(err: ConfigError) -> Self {
        TagTreeError::Config(err.to_string())
    }
}

/// Relative path of the project-local configuration file.
const LOCAL_CONFIG_PATH: &str = "tagtree/config.toml";

/// File name looked up inside the platform config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Explicit,
    Local,
    System,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit => write!(f, "explicit"),
            ConfigSource::Local => write!(f, "local"),
            ConfigSource::System => write!(f, "system"),
        }
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (tagtree/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TagTreeError> {
    // 1. An explicit path is never skipped, even if it does not exist
    if let Some(path) = explicit_path {
        return load_config_file(ConfigSource::Explicit, path.as_ref());
    }

    // 2. and 3. The first search path that exists wins
    for (source, path) in search_paths() {
        if path.exists() {
            return load_config_file(source, &path);
        }
        debug!(source:%, path = path.display().to_string(); "Configuration file not found");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Returns the implicit configuration locations in priority order.
///
/// The platform directory is left out when it cannot be determined.
fn search_paths() -> Vec<(ConfigSource, PathBuf)> {
    let mut paths = vec![(ConfigSource::Local, PathBuf::from(LOCAL_CONFIG_PATH))];

    match ProjectDirs::from("com", "tagtree", "tagtree") {
        Some(proj_dirs) => paths.push((
            ConfigSource::System,
            proj_dirs.config_dir().join(CONFIG_FILE_NAME),
        )),
        None => debug!("Could not determine platform-specific config directory"),
    }

    paths
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `source` - Which search step produced `path`, for logging
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(source: ConfigSource, path: &Path) -> Result<AppConfig, TagTreeError> {
    // Check if file exists
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    info!(source:%, path = path.display().to_string(); "Loading configuration");

    // Read file content
    let content = fs::read_to_string(path)?;

    // Parse TOML content
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[templates]\nnumeric = \"Words\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.templates().numeric(), "Words");
        assert_eq!(config.templates().textual(), "AlarmsDINT2");
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("nope.toml"))).unwrap_err();

        assert!(matches!(err, TagTreeError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\npretty = \"yes please\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_search_paths_start_with_local_config() {
        let paths = search_paths();

        assert_eq!(
            paths[0],
            (ConfigSource::Local, PathBuf::from("tagtree/config.toml"))
        );
        assert!(paths[1..].iter().all(|(source, path)| {
            *source == ConfigSource::System && path.ends_with("config.toml")
        }));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ConfigSource::Explicit.to_string(), "explicit");
        assert_eq!(ConfigSource::System.to_string(), "system");
    }
}
