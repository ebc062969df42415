//! Configuration file loading for the CLI
//!
//! This module finds and loads the TOML configuration file and the
//! endpoint map.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use bpmn2faas::{Bpmn2FaasError, config::AppConfig, endpoint::EndpointMap};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for Bpmn2FaasError {
    fn from(err: ConfigError) -> Self {
        Bpmn2FaasError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (bpmn2faas/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, Bpmn2FaasError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_toml_file(path);
    }

    let local_config = Path::new("bpmn2faas/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_toml_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "bpmn2faas", "bpmn2faas") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_toml_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load the endpoint map, or an empty one when no path is given.
///
/// # Errors
///
/// Returns error if the file doesn't exist or cannot be parsed.
pub fn load_endpoints(path: Option<impl AsRef<Path>>) -> Result<EndpointMap, Bpmn2FaasError> {
    let Some(path) = path else {
        debug!("No endpoint map given, service calls get empty endpoints");
        return Ok(EndpointMap::new());
    };

    let endpoints: EndpointMap = load_toml_file(path.as_ref())?;
    info!(
        path = path.as_ref().display().to_string(),
        endpoints_count = endpoints.len();
        "Endpoint map loaded"
    );
    Ok(endpoints)
}

fn load_toml_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, Bpmn2FaasError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let value = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use bpmn2faas::identifier::Id;

    use super::*;

    #[test]
    fn test_explicit_missing_config_is_error() {
        let err = load_config(Some("/nonexistent/bpmn2faas/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[emit]\nextension = \"py3\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.emit().extension(), "py3");
    }

    #[test]
    fn test_invalid_config_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[emit\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_endpoints_default_to_empty() {
        let endpoints = load_endpoints(None::<&str>).unwrap();
        assert!(endpoints.is_empty());
    }

    #[test]
    fn test_endpoints_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("endpoints.toml");
        fs::write(
            &path,
            "[endpoints]\nArchive = \"orders-archive\"\nEnqueue = \"https://sqs.example/orders\"\n",
        )
        .unwrap();

        let endpoints = load_endpoints(Some(&path)).unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints.get(Id::new("Archive")), "orders-archive");
        assert_eq!(endpoints.get(Id::new("Missing")), "");
    }
}
