//! Configuration file management.
//!
//! [`ConfigManager`] is implemented by each binary's config struct. It
//! provides the file location rules and TOML round-tripping that the
//! `config` subcommands build on.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use crate::{Error, Result};

/// A TOML-backed configuration with environment overrides.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name; also the config directory name.
    fn project_name() -> &'static str;

    /// `<platform config dir>/<project>/config.toml`.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// The explicit path if given, otherwise the default path.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit
            .map(PathBuf::from)
            .or_else(Self::default_config_path)
    }

    /// Apply environment-variable overrides after loading.
    fn apply_env_overrides(&mut self) {}

    /// Load from the resolved path, falling back to defaults when the file
    /// does not exist, then apply environment overrides.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                log::debug!("loading config from {}", path.display());
                toml::from_str(&content)
                    .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Render as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten into `KEY=value` pairs for export.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;
}
