//! Server and client configuration.
//!
//! [`ServerConfig`] is layered: defaults, then an optional TOML file, then
//! environment variables, then command-line flags (applied by the binary).
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//! base_path = "/make-server-e1ba9efb"
//! auth_token = "secret"
//!
//! [store]
//! redis_url = "redis://127.0.0.1:6379"
//! max_update_retries = 5
//! max_title_length = 200
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use weekboard_tasks::StoreConfig;

use crate::error::ConfigError;

/// Default listen address.
pub const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Default client request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Storage selection and limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Redis connection URL. `None` selects the in-memory backend.
    pub redis_url: Option<String>,

    /// Limits enforced by the store.
    #[serde(flatten)]
    pub limits: StoreConfig,
}

/// Configuration for `weekboard-server`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: SocketAddr,
    /// Path prefix every route is mounted under. Empty mounts at the root.
    pub base_path: String,
    /// Static bearer token required on `/tasks` routes, if set.
    pub auth_token: Option<String>,
    /// Storage settings.
    pub store: StoreSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(DEFAULT_BIND),
            base_path: String::new(),
            auth_token: None,
            store: StoreSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Parses a config from TOML. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.base_path = normalize_base_path(&config.base_path);
        config.auth_token = config.auth_token.filter(|t| !t.is_empty());
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Overlays values from the process environment.
    ///
    /// `WEEKBOARD_BIND` sets the whole address; `PORT` then replaces only the
    /// port. `WEEKBOARD_BASE_PATH`, `WEEKBOARD_TOKEN`, and
    /// `WEEKBOARD_REDIS_URL` set their fields.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) with a custom variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("WEEKBOARD_BIND") {
            self.bind = bind.parse().map_err(|e| ConfigError::Env {
                name: "WEEKBOARD_BIND",
                message: format!("{e}"),
            })?;
        }
        if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().map_err(|e| ConfigError::Env {
                name: "PORT",
                message: format!("{e}"),
            })?;
            self.bind.set_port(port);
        }
        if let Some(base_path) = lookup("WEEKBOARD_BASE_PATH") {
            self.base_path = normalize_base_path(&base_path);
        }
        if let Some(token) = lookup("WEEKBOARD_TOKEN") {
            self.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(url) = lookup("WEEKBOARD_REDIS_URL") {
            self.store.redis_url = Some(url).filter(|u| !u.is_empty());
        }
        Ok(())
    }
}

/// Normalizes a route prefix to either `""` or `/segment[/segment...]`
/// without a trailing slash.
///
/// # Examples
///
/// ```
/// use weekboard::config::normalize_base_path;
///
/// assert_eq!(normalize_base_path(""), "");
/// assert_eq!(normalize_base_path("/"), "");
/// assert_eq!(normalize_base_path("api/v1/"), "/api/v1");
/// ```
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Configuration for [`HttpTaskClient`](crate::client::HttpTaskClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server URL including any base path, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Bearer token sent on every request.
    pub token: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Config for the given server URL with default timeout and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
