//! Conversion of service and credential errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::ServiceError;
use credentials::CredentialError;
use tracing::{error, warn};

/// Handler error wrapper; renders a [`ServiceError`] as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        let err = if e.is_credential_fault() {
            ServiceError::InvalidCredentials(e.to_string())
        } else if e.is_upstream() {
            ServiceError::TokenUnavailable(e.to_string())
        } else {
            ServiceError::Internal(e.to_string())
        };
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(kind = self.0.kind(), error = %self.0, "request failed");
        } else {
            warn!(kind = self.0.kind(), error = %self.0, "request rejected");
        }

        (status, Json(self.0.to_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_faults_become_bad_request() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let ApiError(err) = CredentialError::Parse(parse).into();
        assert!(matches!(err, ServiceError::InvalidCredentials(_)));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn upstream_failures_become_bad_gateway() {
        let ApiError(err) = CredentialError::Rejected {
            status: 401,
            body: "unauthorized_client".into(),
        }
        .into();
        assert!(matches!(err, ServiceError::TokenUnavailable(ref d) if d.contains("unauthorized_client")));
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn response_status_matches_error() {
        let resp = ApiError(ServiceError::FileNotPermitted).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
