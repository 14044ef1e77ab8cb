//! Shopping List Routes
//!
//! - GET /api/v1/shopping - Items in priority order
//! - POST /api/v1/shopping - Add an item at the lowest priority
//! - DELETE /api/v1/shopping/:id - Remove an item
//! - POST /api/v1/shopping/:id/up - Raise an item one place
//! - POST /api/v1/shopping/:id/down - Lower an item one place

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AddItemRequest, MoveItemResponse, ShoppingItemResponse, ShoppingListResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/shopping
pub async fn list_items(State(state): State<Arc<AppState>>) -> Json<ShoppingListResponse> {
    Json(ShoppingListResponse::new(state.dashboard.shopping().items()))
}

/// POST /api/v1/shopping
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddItemRequest>,
) -> ApiResult<(StatusCode, Json<ShoppingItemResponse>)> {
    let item = state.dashboard.shopping().add(&req.name)?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// DELETE /api/v1/shopping/:id
///
/// Returns the renumbered list.
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ShoppingListResponse>> {
    let mut list = state.dashboard.shopping();
    list.remove(&id)?;
    Ok(Json(ShoppingListResponse::new(list.items())))
}

/// POST /api/v1/shopping/:id/up
pub async fn move_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MoveItemResponse>> {
    let mut list = state.dashboard.shopping();
    let moved = list.move_up(&id)?;
    Ok(Json(MoveItemResponse {
        moved,
        list: ShoppingListResponse::new(list.items()),
    }))
}

/// POST /api/v1/shopping/:id/down
pub async fn move_down(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MoveItemResponse>> {
    let mut list = state.dashboard.shopping();
    let moved = list.move_down(&id)?;
    Ok(Json(MoveItemResponse {
        moved,
        list: ShoppingListResponse::new(list.items()),
    }))
}
