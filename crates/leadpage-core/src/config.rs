//! Application configuration.
//!
//! [`AppConfig`] is resolved once at startup and handed to the lead
//! repository, the page resolver and the call widget. It is read from a TOML
//! file (see [`ConfigManager`]) and then overridden from `LEADPAGE_*`
//! environment variables:
//!
//! | variable | key |
//! |---|---|
//! | `LEADPAGE_HOST` | `server.host` |
//! | `LEADPAGE_PORT` | `server.port` |
//! | `LEADPAGE_DEMO_SLUG` | `server.demo_slug` |
//! | `LEADPAGE_SUPABASE_URL` | `supabase.url` |
//! | `LEADPAGE_SUPABASE_ANON_KEY` | `supabase.anon_key` |
//! | `LEADPAGE_SUPABASE_TIMEOUT_SECS` | `supabase.timeout_secs` |
//! | `LEADPAGE_VAPI_PUBLIC_KEY` | `voice.public_key` |
//! | `LEADPAGE_LEADS_FILE` | `store.leads_file` |
//!
//! Empty strings count as unset. Missing credentials are not an error here:
//! each component degrades on its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::traits::ConfigManager;
use crate::{Error, Result};

const ENV_HOST: &str = "LEADPAGE_HOST";
const ENV_PORT: &str = "LEADPAGE_PORT";
const ENV_DEMO_SLUG: &str = "LEADPAGE_DEMO_SLUG";
const ENV_SUPABASE_URL: &str = "LEADPAGE_SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "LEADPAGE_SUPABASE_ANON_KEY";
const ENV_SUPABASE_TIMEOUT: &str = "LEADPAGE_SUPABASE_TIMEOUT_SECS";
const ENV_VAPI_PUBLIC_KEY: &str = "LEADPAGE_VAPI_PUBLIC_KEY";
const ENV_LEADS_FILE: &str = "LEADPAGE_LEADS_FILE";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project name, shown in logs and the health endpoint.
    pub project_name: String,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Hosted lead database.
    pub supabase: SupabaseConfig,
    /// Voice-call vendor settings.
    pub voice: VoiceConfig,
    /// Local lead store settings.
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_name: "leadpage".to_string(),
            server: ServerConfig::default(),
            supabase: SupabaseConfig::default(),
            voice: VoiceConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Slug the root path redirects to.
    pub demo_slug: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            demo_slug: "demo".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path the root route redirects to.
    pub fn demo_path(&self) -> String {
        format!("/{}", self.demo_slug)
    }
}

/// Hosted lead database (PostgREST) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Anonymous (public) API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    /// Table holding the lead rows.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "leads".to_string(),
            timeout_secs: 10,
        }
    }
}

/// A complete database endpoint: URL plus credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseEndpoint {
    /// Project URL without a trailing slash.
    pub url: String,
    /// Anonymous API key.
    pub anon_key: String,
}

impl SupabaseConfig {
    /// The endpoint, if both URL and key are set and non-empty.
    pub fn endpoint(&self) -> Option<SupabaseEndpoint> {
        let url = non_empty(self.url.as_deref())?;
        let anon_key = non_empty(self.anon_key.as_deref())?;
        Some(SupabaseEndpoint {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Voice-call vendor settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Client-exposed public key for the voice session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl VoiceConfig {
    /// The public key, if set and non-empty.
    pub fn public_key(&self) -> Option<&str> {
        non_empty(self.public_key.as_deref())
    }
}

/// Local lead store settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file with lead rows, served when no database is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads_file: Option<PathBuf>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("invalid TOML: {e}")))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Takes the lookup as a closure so callers can pass `std::env::var` or
    /// a fixed map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{ENV_PORT} is not a valid port: {port}")))?;
        }
        if let Some(slug) = get(ENV_DEMO_SLUG) {
            self.server.demo_slug = slug;
        }
        if let Some(url) = get(ENV_SUPABASE_URL) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
            self.supabase.anon_key = Some(key);
        }
        if let Some(secs) = get(ENV_SUPABASE_TIMEOUT) {
            self.supabase.timeout_secs = secs.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_SUPABASE_TIMEOUT} is not a number: {secs}"))
            })?;
        }
        if let Some(key) = get(ENV_VAPI_PUBLIC_KEY) {
            self.voice.public_key = Some(key);
        }
        if let Some(path) = get(ENV_LEADS_FILE) {
            self.store.leads_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Log which optional pieces are missing. Never fails.
    pub fn warn_missing(&self) {
        if self.supabase.endpoint().is_none() {
            tracing::warn!(
                "{ENV_SUPABASE_URL} / {ENV_SUPABASE_ANON_KEY} not set; lead lookups will fail closed"
            );
        }
        if self.voice.public_key().is_none() {
            tracing::warn!("{ENV_VAPI_PUBLIC_KEY} not set; the call widget will show a configuration error");
        }
    }
}

impl ConfigManager for AppConfig {
    fn project_name() -> &'static str {
        "leadpage"
    }

    fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(config_path) {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)?
            }
            Some(path) if config_path.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let mut vars = vec![
            (ENV_HOST.to_string(), self.server.host.clone()),
            (ENV_PORT.to_string(), self.server.port.to_string()),
            (ENV_DEMO_SLUG.to_string(), self.server.demo_slug.clone()),
            (
                ENV_SUPABASE_TIMEOUT.to_string(),
                self.supabase.timeout_secs.to_string(),
            ),
        ];
        if let Some(url) = &self.supabase.url {
            vars.push((ENV_SUPABASE_URL.to_string(), url.clone()));
        }
        if let Some(key) = &self.supabase.anon_key {
            vars.push((ENV_SUPABASE_ANON_KEY.to_string(), key.clone()));
        }
        if let Some(key) = &self.voice.public_key {
            vars.push((ENV_VAPI_PUBLIC_KEY.to_string(), key.clone()));
        }
        if let Some(path) = &self.store.leads_file {
            vars.push((ENV_LEADS_FILE.to_string(), path.display().to_string()));
        }
        Ok(vars)
    }
}
