//! Preference Routes
//!
//! - GET /api/v1/preferences
//! - PUT /api/v1/preferences

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::preferences::Preferences;

/// GET /api/v1/preferences
pub async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.dashboard.preferences().get())
}

/// PUT /api/v1/preferences
pub async fn put_preferences(
    State(state): State<Arc<AppState>>,
    Json(next): Json<Preferences>,
) -> ApiResult<Json<Preferences>> {
    let saved = state.dashboard.preferences().set(next)?;
    Ok(Json(saved))
}
