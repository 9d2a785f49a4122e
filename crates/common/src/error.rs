//! The enumerated set of errors that can reach an HTTP caller.

use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Top-level service error type.
///
/// Every variant maps to a fixed HTTP status and a stable `error` message:
/// - [`ServiceError::FilenameRequired`] → 400
/// - [`ServiceError::FileNotReadable`] → 400
/// - [`ServiceError::FileNotPermitted`] → 403
/// - [`ServiceError::InvalidCredentials`] → 400
/// - [`ServiceError::TokenUnavailable`] → 502
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body is not JSON or lacks a non-empty string `filename`.
    #[error("Filename required")]
    FilenameRequired,

    /// The named file could not be resolved or read.
    #[error("File contents not readable")]
    FileNotReadable,

    /// The named file lies outside the configured credentials directory.
    #[error("File not permitted")]
    FileNotPermitted,

    /// The file was read but is not a usable credentials document.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The identity provider could not be reached or refused to issue a token.
    #[error("Not able to retrieve token: {0}")]
    TokenUnavailable(String),

    /// No route matched the request.
    #[error("Not found")]
    NotFound,

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::FilenameRequired => 400,
            ServiceError::FileNotReadable => 400,
            ServiceError::FileNotPermitted => 403,
            ServiceError::InvalidCredentials(_) => 400,
            ServiceError::TokenUnavailable(_) => 502,
            ServiceError::NotFound => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::FilenameRequired => "filename_required",
            ServiceError::FileNotReadable => "file_not_readable",
            ServiceError::FileNotPermitted => "file_not_permitted",
            ServiceError::InvalidCredentials(_) => "invalid_credentials",
            ServiceError::TokenUnavailable(_) => "token_unavailable",
            ServiceError::NotFound => "not_found",
            ServiceError::Internal(_) => "internal",
        }
    }

    /// Build the response body for this error.
    ///
    /// Internal error text is never exposed; it only reaches the logs.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ServiceError::InvalidCredentials(detail) => {
                ErrorResponse::with_detail("Invalid credentials", detail.clone())
            }
            ServiceError::TokenUnavailable(detail) => {
                ErrorResponse::with_detail("Not able to retrieve token", detail.clone())
            }
            ServiceError::Internal(_) => ErrorResponse::new("Internal error"),
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::FilenameRequired.http_status(), 400);
        assert_eq!(ServiceError::FileNotReadable.http_status(), 400);
        assert_eq!(ServiceError::FileNotPermitted.http_status(), 403);
        assert_eq!(ServiceError::InvalidCredentials("x".into()).http_status(), 400);
        assert_eq!(ServiceError::TokenUnavailable("x".into()).http_status(), 502);
        assert_eq!(ServiceError::NotFound.http_status(), 404);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn client_errors_have_fixed_messages() {
        let body = serde_json::to_value(ServiceError::FilenameRequired.to_response()).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Filename required"}));

        let body = serde_json::to_value(ServiceError::FileNotReadable.to_response()).unwrap();
        assert_eq!(body, serde_json::json!({"error": "File contents not readable"}));
    }

    #[test]
    fn credential_errors_carry_detail() {
        let e = ServiceError::InvalidCredentials("missing field `private_key`".into());
        let body = e.to_response();
        assert_eq!(body.error, "Invalid credentials");
        assert_eq!(body.detail.as_deref(), Some("missing field `private_key`"));
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let body = ServiceError::Internal("signing backend exploded".into()).to_response();
        assert_eq!(body.error, "Internal error");
        assert!(body.detail.is_none());
    }
}
