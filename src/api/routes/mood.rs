//! Mood Tracker Routes
//!
//! - GET /api/v1/mood - Recent history plus statistics
//! - GET /api/v1/mood/catalog - Every mood with its suggestions
//! - POST /api/v1/mood - Record a mood

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{MoodHistoryResponse, RecordMoodRequest, RecordMoodResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::mood::{MoodInfo, MoodTracker};

/// GET /api/v1/mood
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<MoodHistoryResponse> {
    let tracker = state.dashboard.mood();
    Json(MoodHistoryResponse {
        history: tracker.history().to_vec(),
        stats: tracker.stats(),
    })
}

/// GET /api/v1/mood/catalog
pub async fn get_catalog() -> Json<Vec<MoodInfo>> {
    Json(MoodTracker::catalog())
}

/// POST /api/v1/mood
///
/// An unknown mood is rejected by the JSON extractor before reaching the tracker.
pub async fn record_mood(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordMoodRequest>,
) -> ApiResult<(StatusCode, Json<RecordMoodResponse>)> {
    let entry = state.dashboard.mood().record(req.mood)?;

    Ok((
        StatusCode::CREATED,
        Json(RecordMoodResponse {
            suggestions: entry.mood.suggestions().to_vec(),
            entry,
        }),
    ))
}
