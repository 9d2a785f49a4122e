//! Firebase custom tokens, signed locally with a service account key.
//!
//! See <https://firebase.google.com/docs/auth/admin/create-custom-tokens#create_custom_tokens_using_a_third-party_jwt_library>

use async_trait::async_trait;
use jsonwebtoken::get_current_timestamp;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CredentialError;
use crate::file::{CredentialsFile, ServiceAccount};
use crate::minter::TokenMinter;

pub const FIREBASE_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Firebase refuses custom tokens that live longer than an hour.
const TOKEN_LIFETIME_SECS: u64 = 60 * 60;

const MAX_UID_LEN: usize = 128;
const MAX_CLAIMS_LEN: usize = 1000;

const RESERVED_CLAIMS: [&str; 16] = [
    "acr", "amr", "at_hash", "aud", "auth_time", "azp", "cnf", "c_hash", "exp", "firebase",
    "iat", "iss", "jti", "nbf", "nonce", "sub",
];

/// Mints Firebase custom tokens for a fixed subject `uid`.
#[derive(Debug, Clone)]
pub struct CustomTokenMinter {
    uid: String,
    claims: Option<Map<String, Value>>,
}

impl CustomTokenMinter {
    pub fn new(uid: impl Into<String>) -> Result<Self, CredentialError> {
        let uid = uid.into();
        let len = uid.chars().count();
        if len == 0 || len > MAX_UID_LEN {
            return Err(CredentialError::InvalidClaims(format!(
                "uid must be between 1 and {MAX_UID_LEN} characters, got {len}"
            )));
        }
        Ok(Self { uid, claims: None })
    }

    /// Attach developer claims, which end up in the ID token of the user who
    /// signs in with the custom token.
    pub fn with_claims(mut self, claims: Value) -> Result<Self, CredentialError> {
        let Value::Object(claims) = claims else {
            return Err(CredentialError::InvalidClaims(
                "developer claims must be a JSON object".into(),
            ));
        };

        if let Some(reserved) = claims.keys().find(|k| RESERVED_CLAIMS.contains(&k.as_str())) {
            return Err(CredentialError::InvalidClaims(format!(
                "developer claim {reserved:?} is reserved"
            )));
        }

        let serialized_len = Value::Object(claims.clone()).to_string().len();
        if serialized_len > MAX_CLAIMS_LEN {
            return Err(CredentialError::InvalidClaims(format!(
                "developer claims must not exceed {MAX_CLAIMS_LEN} bytes when serialized"
            )));
        }

        self.claims = (!claims.is_empty()).then_some(claims);
        Ok(self)
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Sign a custom token for the configured uid with `service_account`'s key.
    pub fn sign(&self, service_account: &ServiceAccount) -> Result<String, CredentialError> {
        let issued_at = get_current_timestamp();
        let claims = CustomTokenClaims {
            iss: &service_account.client_email,
            sub: &service_account.client_email,
            aud: FIREBASE_AUDIENCE,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
            uid: &self.uid,
            claims: self.claims.as_ref(),
        };

        let encoding_key = service_account.encoding_key()?;
        jsonwebtoken::encode(&service_account.jwt_header(), &claims, &encoding_key)
            .map_err(CredentialError::Signing)
    }
}

#[async_trait]
impl TokenMinter for CustomTokenMinter {
    async fn mint(&self, key: &[u8]) -> Result<String, CredentialError> {
        match CredentialsFile::from_slice(key)? {
            CredentialsFile::ServiceAccount(sa) => self.sign(&sa),
            other => Err(CredentialError::Unsupported {
                kind: other.kind(),
                token: "a Firebase custom token",
            }),
        }
    }
}

#[derive(Serialize)]
struct CustomTokenClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
    uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    claims: Option<&'a Map<String, Value>>,
}
