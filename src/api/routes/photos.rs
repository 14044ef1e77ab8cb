//! Photo Gallery Routes
//!
//! - GET /api/v1/photos - List photos, newest first
//! - POST /api/v1/photos - Add photo metadata
//! - DELETE /api/v1/photos/:id - Delete a photo

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::PhotoListResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::photos::{PhotoRecord, PhotoUpload};

/// GET /api/v1/photos
pub async fn list_photos(State(state): State<Arc<AppState>>) -> Json<PhotoListResponse> {
    let photos = state.dashboard.photos().photos().to_vec();
    Json(PhotoListResponse {
        total: photos.len(),
        photos,
    })
}

/// POST /api/v1/photos
pub async fn add_photo(
    State(state): State<Arc<AppState>>,
    Json(upload): Json<PhotoUpload>,
) -> ApiResult<(StatusCode, Json<PhotoRecord>)> {
    let photo = state.dashboard.photos().add(upload)?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// DELETE /api/v1/photos/:id
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.dashboard.photos().delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
