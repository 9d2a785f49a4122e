//! Configuration loading and validation for the token service.
//!
//! An optional environment file is loaded first, then all values are read
//! from environment variables. Every problem is reported as a single startup
//! error; nothing here exits the process.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::server::middleware::DEFAULT_REQUEST_TIMEOUT;

/// Which kind of token the service hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Google OAuth2 bearer access token.
    Access,
    /// Firebase custom token.
    Custom,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Custom => "custom",
        }
    }
}

impl FromStr for TokenKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "access" => Ok(TokenKind::Access),
            "custom" => Ok(TokenKind::Custom),
            other => anyhow::bail!("TOKEN_KIND must be \"access\" or \"custom\", got {other:?}"),
        }
    }
}

/// Outcome of loading the environment file, reported once logging is up.
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing(PathBuf),
}

/// Load `ENV_FILE` (default `.env`) into the process environment.
///
/// A missing file is not an error. Variables already set in the environment
/// take precedence over the file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_env_file() -> Result<EnvFile> {
    let path = std::env::var_os("ENV_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".env"));
    load_env_file_from(&path)
}

fn load_env_file_from(path: &Path) -> Result<EnvFile> {
    match dotenv::from_path(path) {
        Ok(()) => Ok(EnvFile::Loaded(path.to_owned())),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(EnvFile::Missing(path.to_owned()))
        }
        Err(e) => Err(e).with_context(|| format!("failed to load env file {}", path.display())),
    }
}

/// Validated token service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bind address, `host:port` or `:port`. **Required.**
    pub server_url: String,

    /// `access` or `custom`.
    #[serde(default = "default_token_kind")]
    pub token_kind: String,

    /// Space- or comma-separated OAuth2 scopes for access tokens.
    #[serde(default = "default_oauth_scopes")]
    pub oauth_scopes: String,

    /// Subject uid of minted custom tokens. Required when `token_kind` is `custom`.
    #[serde(default)]
    pub custom_token_uid: Option<String>,

    /// JSON object of developer claims embedded in custom tokens.
    #[serde(default)]
    pub custom_token_claims: Option<String>,

    /// Directory credential files must live in. Unset means any readable path.
    #[serde(default)]
    pub credentials_dir: Option<PathBuf>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Unset disables export.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_token_kind() -> String {
    "access".into()
}
fn default_oauth_scopes() -> String {
    "https://www.googleapis.com/auth/firebase.messaging".into()
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or any value is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is SERVER_URL set?)")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            anyhow::bail!("SERVER_URL is required and must not be empty");
        }

        match self.token_kind()? {
            TokenKind::Access => {
                if self.scopes().is_empty() {
                    anyhow::bail!("OAUTH_SCOPES must name at least one scope");
                }
            }
            TokenKind::Custom => {
                let uid = self.custom_token_uid.as_deref().unwrap_or_default();
                if uid.trim().is_empty() {
                    anyhow::bail!("CUSTOM_TOKEN_UID is required when TOKEN_KIND is \"custom\"");
                }
                self.custom_claims()?;
            }
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }

    pub fn token_kind(&self) -> Result<TokenKind> {
        self.token_kind.parse()
    }

    pub fn scopes(&self) -> Vec<String> {
        self.oauth_scopes
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Parsed `CUSTOM_TOKEN_CLAIMS`, if set.
    pub fn custom_claims(&self) -> Result<Option<serde_json::Value>> {
        match self.custom_token_claims.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .context("CUSTOM_TOKEN_CLAIMS must be a JSON object"),
        }
    }

    /// Address to bind, with a bare `:port` expanded to all interfaces.
    pub fn bind_addr(&self) -> String {
        let url = self.server_url.trim();
        match url.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => url.to_owned(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
