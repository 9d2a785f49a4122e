//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use credentials::{AccessTokenMinter, CustomTokenMinter, TokenMinter};

use crate::config::{Config, TokenKind};
use crate::files::CredentialFiles;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or `Copy`) so that Axum can
/// clone the state for each request. None of them is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Turns credential file bytes into a token.
    pub minter: Arc<dyn TokenMinter>,
    /// Where credential files may be read from.
    pub files: CredentialFiles,
    pub token_kind: TokenKind,
}

impl AppState {
    pub fn new(minter: Arc<dyn TokenMinter>, files: CredentialFiles, token_kind: TokenKind) -> Self {
        Self {
            minter,
            files,
            token_kind,
        }
    }

    /// Build the minter and file policy described by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom-token uid or claims are rejected, the
    /// HTTP client cannot be built, or `CREDENTIALS_DIR` is unusable.
    pub async fn from_config(cfg: &Config) -> Result<Self> {
        let token_kind = cfg.token_kind()?;

        let minter: Arc<dyn TokenMinter> = match token_kind {
            TokenKind::Access => Arc::new(
                AccessTokenMinter::new(&cfg.scopes()).context("failed to build HTTP client")?,
            ),
            TokenKind::Custom => {
                let uid = cfg.custom_token_uid.as_deref().unwrap_or_default();
                let mut minter =
                    CustomTokenMinter::new(uid).context("invalid CUSTOM_TOKEN_UID")?;
                if let Some(claims) = cfg.custom_claims()? {
                    minter = minter
                        .with_claims(claims)
                        .context("invalid CUSTOM_TOKEN_CLAIMS")?;
                }
                Arc::new(minter)
            }
        };

        let files = match &cfg.credentials_dir {
            Some(dir) => CredentialFiles::restricted_to(dir).await?,
            None => CredentialFiles::unrestricted(),
        };

        Ok(Self::new(minter, files, token_kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token_kind: &str) -> Config {
        Config {
            server_url: ":8080".into(),
            token_kind: token_kind.into(),
            oauth_scopes: "https://www.googleapis.com/auth/firebase.messaging".into(),
            custom_token_uid: Some("svc-user".into()),
            custom_token_claims: None,
            credentials_dir: None,
            request_timeout_secs: 30,
            log_level: "info".into(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[tokio::test]
    async fn builds_access_state() {
        let state = AppState::from_config(&config("access")).await.unwrap();
        assert_eq!(state.token_kind, TokenKind::Access);
        assert!(state.files.root().is_none());
    }

    #[tokio::test]
    async fn builds_custom_state_with_credentials_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            credentials_dir: Some(dir.path().to_owned()),
            custom_token_claims: Some(r#"{"tier": "gold"}"#.into()),
            ..config("custom")
        };
        let state = AppState::from_config(&cfg).await.unwrap();
        assert_eq!(state.token_kind, TokenKind::Custom);
        assert!(state.files.root().is_some());
    }

    #[tokio::test]
    async fn rejects_reserved_custom_claims() {
        let cfg = Config {
            custom_token_claims: Some(r#"{"sub": "someone-else"}"#.into()),
            ..config("custom")
        };
        assert!(AppState::from_config(&cfg).await.is_err());
    }
}
