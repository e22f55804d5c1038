//! Settings API endpoint
//!
//! POST /api/settings/api-keys/:provider stores a provider key in the
//! database (authoritative tier) and applies it to the running service.

use crate::providers::{is_valid_key, ProviderKind};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/settings/api-keys/:provider
///
/// **Errors:**
/// - 400 Bad Request: unknown or keyless provider, empty or whitespace-only key
/// - 500 Internal Server Error: database write failure
pub async fn set_provider_api_key(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(payload): Json<SetApiKeyRequest>,
) -> ApiResult<Json<SetApiKeyResponse>> {
    let kind = ProviderKind::parse(&provider)
        .filter(|kind| kind.requires_key())
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown provider or provider takes no key: {}", provider))
        })?;

    if !is_valid_key(&payload.api_key) {
        return Err(ApiError::BadRequest(
            "API key cannot be empty or whitespace-only".to_string(),
        ));
    }

    crate::db::settings::set_provider_api_key(&state.db, kind, payload.api_key.clone())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save API key to database: {}", e)))?;

    state.keys.write().await.set(kind, Some(payload.api_key));

    info!(provider = kind.as_str(), "API key configured via settings API");

    Ok(Json(SetApiKeyResponse {
        success: true,
        message: format!("{} API key saved", kind.as_str()),
    }))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/api/settings/api-keys/:provider", post(set_provider_api_key))
}
