//! Manual image selection endpoints
//!
//! GET lists every candidate for one character plus the avatar palette;
//! POST stores the image the user picked after checking its URL.

use crate::avatar::avatar_options;
use crate::image_urls::{sized_image_url, validate_image_url};
use crate::types::{CandidateImage, CharacterQuery};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use cverse_common::db::{Character, ImageMetadata};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct ImageListQuery {
    /// Rewrite candidate URLs for this width
    pub width: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterImageSummary {
    pub id: String,
    pub name: String,
    pub current_image: Option<String>,
    pub image_source: Option<String>,
    pub image_license: Option<String>,
    pub image_attribution: Option<String>,
}

impl From<&Character> for CharacterImageSummary {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id.clone(),
            name: character.name.clone(),
            current_image: character.image_url.clone(),
            image_source: character.image_source.clone(),
            image_license: character.image_license.clone(),
            image_attribution: character.image_attribution.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListResponse {
    pub character: CharacterImageSummary,
    pub image_options: Vec<CandidateImage>,
    pub avatar_options: Vec<CandidateImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectImageRequest {
    pub image_url: Option<String>,
    pub source: Option<String>,
    pub license: Option<String>,
    pub attribution: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedImage {
    pub id: String,
    pub image_url: Option<String>,
    pub image_source: Option<String>,
    pub image_license: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectImageResponse {
    pub success: bool,
    pub character: SelectedImage,
}

async fn load_character(state: &AppState, id: &str) -> ApiResult<Character> {
    state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Character not found: {}", id)))
}

fn resize_all(candidates: &mut [CandidateImage], width: Option<u32>) {
    if let Some(width) = width {
        for candidate in candidates {
            candidate.url = sized_image_url(&candidate.url, width);
        }
    }
}

/// GET /api/characters/:id/images
pub async fn list_character_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ImageListQuery>,
) -> ApiResult<Json<ImageListResponse>> {
    let character = load_character(&state, &id).await?;

    let resolver = state.resolver().await;
    let mut image_options = resolver
        .gather_candidates(&CharacterQuery::from(&character))
        .await;
    let mut avatars = avatar_options(&character.name, &state.profile.avatar);

    resize_all(&mut image_options, params.width);
    resize_all(&mut avatars, params.width);

    Ok(Json(ImageListResponse {
        character: CharacterImageSummary::from(&character),
        image_options,
        avatar_options: avatars,
    }))
}

/// POST /api/characters/:id/images
pub async fn select_character_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SelectImageRequest>,
) -> ApiResult<Json<SelectImageResponse>> {
    load_character(&state, &id).await?;

    if let Some(url) = payload.image_url.as_deref() {
        if !validate_image_url(&state.http_client, url).await {
            return Err(ApiError::BadRequest("Invalid image URL".to_string()));
        }
    }

    let image = ImageMetadata {
        url: payload.image_url,
        source: payload.source,
        license: payload.license,
        attribution: payload.attribution,
    };
    state.store.update_image(&id, &image).await?;

    info!(character_id = %id, source = ?image.source, "Character image selected manually");

    Ok(Json(SelectImageResponse {
        success: true,
        character: SelectedImage {
            id,
            image_url: image.url,
            image_source: image.source,
            image_license: image.license,
        },
    }))
}

pub fn image_routes() -> Router<AppState> {
    Router::new().route(
        "/api/characters/:id/images",
        get(list_character_images).post(select_character_image),
    )
}
