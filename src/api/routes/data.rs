//! Data Routes
//!
//! - DELETE /api/v1/data - Wipe every widget's stored data

use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;

/// DELETE /api/v1/data
///
/// Pending simulations are abandoned; timers that fire later find nothing to update.
pub async fn clear_all(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
) -> ApiResult<StatusCode> {
    tracing::info!(uid = %me.uid, "Clearing all dashboard data");
    state.dashboard.clear_all()?;
    Ok(StatusCode::NO_CONTENT)
}
