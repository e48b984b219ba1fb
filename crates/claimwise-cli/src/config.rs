//! Configuration loading for the CLI.

use crate::error::{CliError, Result};
use claimwise_engine::ClaimwiseConfig;
use std::path::{Path, PathBuf};

/// Get the default configuration file path.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".claimwise").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, `~/.claimwise/config.toml` is
/// read when present and the built-in defaults are used otherwise.
pub fn load(explicit: Option<&Path>) -> Result<ClaimwiseConfig> {
    match explicit {
        Some(path) => load_from(Some(path), None),
        None => load_from(None, default_path().ok().as_deref()),
    }
}

fn load_from(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<ClaimwiseConfig> {
    if let Some(path) = explicit {
        tracing::debug!("Loading configuration from {}", path.display());
        return Ok(ClaimwiseConfig::from_file(path)?);
    }

    match fallback {
        Some(path) if path.exists() => {
            tracing::debug!("Loading configuration from {}", path.display());
            Ok(ClaimwiseConfig::from_file(path)?)
        }
        _ => {
            tracing::debug!("No configuration file found; using defaults");
            Ok(ClaimwiseConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fallback_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(None, Some(&dir.path().join("config.toml"))).unwrap();
        assert_eq!(config, ClaimwiseConfig::default());
    }

    #[test]
    fn test_fallback_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\npath = \"claims.db\"\n").unwrap();

        let config = load_from(None, Some(&path)).unwrap();
        assert_eq!(config.store.path, PathBuf::from("claims.db"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from(Some(&dir.path().join("missing.toml")), None);
        assert!(matches!(result, Err(CliError::Engine(_))));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nembedding_dimension = 0\n").unwrap();

        assert!(load_from(Some(&path), None).is_err());
    }
}
