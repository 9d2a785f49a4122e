//! Request and response bodies of the public HTTP API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Token endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameRequest {
    /// Path of the credentials file to exchange for a token.
    pub filename: String,
}

/// Successful response body for `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token or signed custom token.
    pub token: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned on any non-2xx status.
///
/// `error` is one of a fixed set of messages; `detail` is only present for
/// error kinds that carry underlying error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Which token variant this instance mints: `"access"` or `"custom"`.
    pub token_kind: String,
}
