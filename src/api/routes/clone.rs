//! Clone Board Routes
//!
//! - GET /api/v1/clone - Task board with statuses
//! - POST /api/v1/clone/:id - Send the clone to work on a task

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::CloneBoardResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::clone::CloneTaskView;

/// GET /api/v1/clone
pub async fn get_board(State(state): State<Arc<AppState>>) -> Json<CloneBoardResponse> {
    let board = state.dashboard.clone_board();
    Json(CloneBoardResponse {
        tasks: board.tasks(),
        active_task: board.active_task(),
        stats: board.stats(),
    })
}

/// POST /api/v1/clone/:id
pub async fn activate_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> ApiResult<(StatusCode, Json<CloneTaskView>)> {
    let view = state.dashboard.clone_board().activate(id)?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}
