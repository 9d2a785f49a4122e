use thiserror::Error;

/// Errors produced while parsing credentials or minting a token.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The bytes are not a JSON credentials document of a known `type`.
    #[error("failed to parse credentials file: {0}")]
    Parse(#[source] serde_json::Error),

    /// The credentials document is valid but cannot produce this kind of token.
    #[error("{kind} credentials cannot be used to mint {token}")]
    Unsupported {
        kind: &'static str,
        token: &'static str,
    },

    /// The `private_key` field is not a usable RSA PEM key.
    #[error("invalid private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign JWT: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token endpoint could not be reached or its response body could not be read.
    #[error("token request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("token endpoint returned token type {0:?}, expected Bearer")]
    UnexpectedTokenType(String),

    /// Custom-token uid or developer claims violate Firebase's constraints.
    #[error("invalid custom token claims: {0}")]
    InvalidClaims(String),
}

impl CredentialError {
    /// Whether the error is caused by the supplied credentials rather than by
    /// the identity provider or the local signer.
    pub fn is_credential_fault(&self) -> bool {
        matches!(
            self,
            CredentialError::Parse(_)
                | CredentialError::Unsupported { .. }
                | CredentialError::InvalidKey(_)
                | CredentialError::InvalidClaims(_)
        )
    }

    /// Whether the error comes from talking to the token endpoint.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CredentialError::Request(_)
                | CredentialError::Rejected { .. }
                | CredentialError::UnexpectedTokenType(_)
        )
    }
}
