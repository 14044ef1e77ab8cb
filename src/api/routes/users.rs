//! User Directory Routes
//!
//! - GET /api/v1/users - Everyone except the caller
//! - GET /api/v1/users?q= - Search by email

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{UserListResponse, UserSearchQuery};
use crate::api::error::ApiResult;
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let directory = state.dashboard.directory();

    let users = match query.q {
        Some(q) => directory.search(&q, &me.email)?,
        None => directory.others(&me.email),
    };

    Ok(Json(UserListResponse {
        total: users.len(),
        users,
    }))
}
