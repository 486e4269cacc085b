//! Queue and server configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::{QueueLimits, DEFAULT_MAX_CONCURRENT_REQUESTS};

/// How the password is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// `p=enc:<hex>` obfuscated password.
    #[default]
    Hex,
    /// Password sent verbatim.
    Plain,
    /// Salted token: `t=md5(password + salt)` with `s=salt`, fresh per request.
    Token,
}

impl std::str::FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "plain" => Ok(Self::Plain),
            "token" => Ok(Self::Token),
            other => Err(format!("unknown auth method `{other}`")),
        }
    }
}

/// Admission queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum scrobble requests in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

const fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

impl QueueConfig {
    /// Validate queue configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be greater than 0".into());
        }
        Ok(())
    }

    /// Capacity limits enforced by the queue.
    pub const fn limits(&self) -> QueueLimits {
        QueueLimits {
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }
}

/// Subsonic server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://music.example.org`.
    pub server_url: String,
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Password encoding.
    #[serde(default)]
    pub auth_method: AuthMethod,
    /// Value of the `c` parameter.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Value of the `v` parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Reject invalid TLS certificates.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_api_version() -> String {
    "1.13.0".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_verify_tls() -> bool {
    true
}

impl ServerConfig {
    /// Create settings with defaults for everything but the credentials.
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
            auth_method: AuthMethod::default(),
            client_name: default_client_name(),
            api_version: default_api_version(),
            request_timeout_secs: default_timeout_secs(),
            verify_tls: default_verify_tls(),
        }
    }

    /// Validate server configuration values.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.server_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("server_url `{url}` must start with http:// or https://"));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err("username and password must not be empty".into());
        }
        if self.client_name.is_empty() {
            return Err("client_name must not be empty".into());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".into());
        }
        Ok(())
    }
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrobblerConfig {
    /// Admission queue settings.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Server connection settings.
    pub server: ServerConfig,
}

impl ScrobblerConfig {
    /// Validate queue and server sections.
    pub fn validate(&self) -> Result<(), String> {
        self.queue
            .validate()
            .map_err(|e| format!("queue invalid: {e}"))?;
        self.server
            .validate()
            .map_err(|e| format!("server invalid: {e}"))?;
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the environment, loading `.env` first if present.
    ///
    /// Reads `SUBSONIC_URL`, `SUBSONIC_USERNAME`, `SUBSONIC_PASSWORD`, and the
    /// optional `SUBSONIC_AUTH_METHOD` and `SCROBBLE_MAX_CONCURRENT`.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| lookup(key).ok_or_else(|| format!("{key} is not set"));

        let mut server = ServerConfig::new(
            require("SUBSONIC_URL")?,
            require("SUBSONIC_USERNAME")?,
            require("SUBSONIC_PASSWORD")?,
        );
        if let Some(method) = lookup("SUBSONIC_AUTH_METHOD") {
            server.auth_method = method.parse()?;
        }

        let mut queue = QueueConfig::default();
        if let Some(raw) = lookup("SCROBBLE_MAX_CONCURRENT") {
            queue.max_concurrent_requests = raw
                .trim()
                .parse()
                .map_err(|e| format!("SCROBBLE_MAX_CONCURRENT `{raw}`: {e}"))?;
        }

        let cfg = Self { queue, server };
        cfg.validate()?;
        Ok(cfg)
    }
}
