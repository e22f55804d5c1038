//! Batch update endpoints

use crate::batch::{update_all, BatchStats};
use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
pub struct BatchInfoResponse {
    pub message: String,
    pub description: String,
    pub profile: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchRunResponse {
    pub success: bool,
    pub message: String,
    pub stats: BatchStats,
}

#[derive(Debug, Serialize)]
pub struct BatchFailureResponse {
    pub success: bool,
    pub error: String,
    pub details: String,
}

/// GET /api/update-images
pub async fn batch_info(State(state): State<AppState>) -> Json<BatchInfoResponse> {
    let profile = &state.profile;
    let mut sources: Vec<String> = profile
        .providers
        .iter()
        .map(|kind| kind.description().to_string())
        .collect();
    sources.push(format!("{} - as fallback", profile.avatar.license));

    Json(BatchInfoResponse {
        message: "Character Image Update API".to_string(),
        description: format!(
            "POST to this endpoint to update all character images using the '{}' profile",
            profile.name
        ),
        profile: profile.name.clone(),
        sources,
    })
}

/// POST /api/update-images
///
/// Runs to completion before responding. 409 while another batch runs.
pub async fn run_batch(State(state): State<AppState>) -> Result<Response, ApiError> {
    let Ok(_guard) = state.batch_lock.try_lock() else {
        return Err(ApiError::Conflict(
            "A batch image update is already running".to_string(),
        ));
    };

    info!(profile = %state.profile.name, "Batch image update requested");
    let resolver = state.resolver().await;

    let response = match update_all(&resolver, state.store.as_ref()).await {
        Ok(stats) => Json(BatchRunResponse {
            success: true,
            message: "Character images updated successfully".to_string(),
            stats,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Batch image update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BatchFailureResponse {
                    success: false,
                    error: "Failed to update character images".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    Ok(response)
}

pub fn batch_routes() -> Router<AppState> {
    Router::new().route("/api/update-images", get(batch_info).post(run_batch))
}
