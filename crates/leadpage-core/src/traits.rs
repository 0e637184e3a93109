//! Shared traits.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;

/// A TOML-backed configuration type with a well-known location on disk.
///
/// The CLI's `config` subcommands are generic over this trait.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name, used for the config directory and env var prefix.
    fn project_name() -> &'static str;

    /// Environment variable that points at an explicit config file.
    fn config_env_var() -> String {
        format!(
            "{}_CONFIG",
            Self::project_name().to_uppercase().replace(['-', ' '], "_")
        )
    }

    /// Platform default: `<config_dir>/<project>/config.toml`.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config file path.
    ///
    /// Checks in order:
    /// 1. The explicit path, if given
    /// 2. The `{PROJECT}_CONFIG` environment variable
    /// 3. [`ConfigManager::default_config_path`]
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(Self::config_env_var())
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load the configuration from the resolved path.
    ///
    /// A missing file yields the defaults; environment overrides apply on top.
    fn load(config_path: Option<&str>) -> Result<Self>;

    /// Serialize to pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Environment variables that reproduce this configuration.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;
}
