//! Axum request handlers for all service endpoints.

use axum::{extract::State, Json};
use bytes::Bytes;
use common::protocol::{FilenameRequest, HealthResponse, TokenResponse};
use common::ServiceError;
use tracing::{info, warn};

use super::error::ApiError;
use super::state::AppState;

/// `POST /token` — exchange a credentials file for a token.
///
/// The body is parsed as JSON whatever its `Content-Type`. The named file is
/// read and minted afresh on every call; nothing is cached.
pub async fn token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let req: FilenameRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "bad request, filename not provided");
        ServiceError::FilenameRequired
    })?;

    if req.filename.trim().is_empty() {
        return Err(ServiceError::FilenameRequired.into());
    }

    let key = state.files.read(&req.filename).await?;
    let token = state.minter.mint(&key).await?;

    info!(
        filename = %req.filename,
        token_kind = state.token_kind.as_str(),
        "token issued"
    );
    Ok(Json(TokenResponse { token }))
}

/// `GET /health` — liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        token_kind: state.token_kind.as_str().into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> ApiError {
    ServiceError::NotFound.into()
}
