//! Employee Simulation Routes
//!
//! - GET /api/v1/employees - Roster and task statistics
//! - POST /api/v1/employees/:id/tasks - Hand a task to an available employee

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{EmployeeListResponse, SubmitTaskRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::employees::TaskRecord;

/// GET /api/v1/employees
pub async fn list_employees(State(state): State<Arc<AppState>>) -> Json<EmployeeListResponse> {
    let manager = state.dashboard.employees();
    Json(EmployeeListResponse {
        employees: manager.employees(),
        stats: manager.stats(),
    })
}

/// POST /api/v1/employees/:id/tasks
///
/// 202: the task completes later. 409 when the employee is not available.
pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<SubmitTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskRecord>)> {
    let task = state.dashboard.employees().submit_task(id, &req.description)?;
    Ok((StatusCode::ACCEPTED, Json(task)))
}
