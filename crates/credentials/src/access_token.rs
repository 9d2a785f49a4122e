//! OAuth2 access tokens from Google credential files.
//!
//! Service accounts use the JWT-bearer grant (RFC 7523): a self-signed
//! assertion is posted to the account's `token_uri`. Authorized users use the
//! plain refresh-token grant against the same kind of endpoint.

use async_trait::async_trait;
use jsonwebtoken::get_current_timestamp;
use serde::{Deserialize, Serialize};

use crate::error::CredentialError;
use crate::file::{AuthorizedUser, CredentialsFile, ServiceAccount};
use crate::minter::TokenMinter;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Lifetime of the signed assertion. Google rejects anything above one hour.
const ASSERTION_LIFETIME_SECS: u64 = 60 * 60;

/// Exchanges credential files for OAuth2 bearer access tokens.
///
/// The scope set is fixed at construction; the HTTP client is shared by all
/// requests so its connection pool is reused, but no token is ever cached.
#[derive(Clone)]
pub struct AccessTokenMinter {
    scope: String,
    http_client: reqwest::Client,
}

impl AccessTokenMinter {
    pub fn new(scopes: &[String]) -> Result<Self, CredentialError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("token-svc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CredentialError::Request)?;

        Ok(Self::with_client(http_client, scopes))
    }

    pub fn with_client(http_client: reqwest::Client, scopes: &[String]) -> Self {
        Self {
            scope: scopes.join(" "),
            http_client,
        }
    }

    /// Fetch a new access token for `credentials`.
    pub async fn fetch(&self, credentials: &CredentialsFile) -> Result<String, CredentialError> {
        match credentials {
            CredentialsFile::ServiceAccount(sa) => {
                let assertion = self.create_assertion(sa)?;
                let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];
                self.exchange(&sa.token_uri, &form).await
            }
            CredentialsFile::AuthorizedUser(user) => self.refresh(user).await,
        }
    }

    async fn refresh(&self, user: &AuthorizedUser) -> Result<String, CredentialError> {
        let form = [
            ("grant_type", REFRESH_TOKEN_GRANT),
            ("client_id", user.client_id.as_str()),
            ("client_secret", user.client_secret.as_str()),
            ("refresh_token", user.refresh_token.as_str()),
        ];
        self.exchange(&user.token_uri, &form).await
    }

    fn create_assertion(&self, sa: &ServiceAccount) -> Result<String, CredentialError> {
        let issued_at = get_current_timestamp();

        let claims = AssertionClaims {
            iss: &sa.client_email,
            scope: &self.scope,
            aud: &sa.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = sa.encoding_key()?;
        jsonwebtoken::encode(&sa.jwt_header(), &claims, &encoding_key)
            .map_err(CredentialError::Signing)
    }

    #[tracing::instrument(name = "Fetch OAuth2 access token", skip(self, form))]
    async fn exchange(
        &self,
        token_uri: &str,
        form: &[(&str, &str)],
    ) -> Result<String, CredentialError> {
        let res = self
            .http_client
            .post(token_uri)
            .form(form)
            .send()
            .await
            .map_err(CredentialError::Request)?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|e| format!("failed to read response body: {e}"));
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = res
            .json::<AccessTokenResponse>()
            .await
            .map_err(CredentialError::Request)?;

        if !body.token_type.eq_ignore_ascii_case("bearer") {
            return Err(CredentialError::UnexpectedTokenType(body.token_type));
        }

        tracing::debug!(expires_in = ?body.expires_in, "access token issued");
        Ok(body.access_token)
    }
}

#[async_trait]
impl TokenMinter for AccessTokenMinter {
    async fn mint(&self, key: &[u8]) -> Result<String, CredentialError> {
        let credentials = CredentialsFile::from_slice(key)?;
        self.fetch(&credentials).await
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}
