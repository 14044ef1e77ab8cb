//! Net Worth Routes
//!
//! - GET /api/v1/networth - Summary, assets and transactions
//! - POST /api/v1/networth/assets - Buy an asset
//! - DELETE /api/v1/networth/assets/:id - Sell an asset back
//! - POST /api/v1/networth/transactions - Record income or an expense

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AddAssetRequest, AddTransactionRequest, NetWorthResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::networth::NetWorthTracker;

fn snapshot(tracker: &NetWorthTracker) -> NetWorthResponse {
    let ledger = tracker.ledger();
    NetWorthResponse {
        summary: tracker.summary(),
        assets: ledger.assets.clone(),
        transactions: ledger.transactions.clone(),
    }
}

/// GET /api/v1/networth
pub async fn get_networth(State(state): State<Arc<AppState>>) -> Json<NetWorthResponse> {
    Json(snapshot(&state.dashboard.networth()))
}

/// POST /api/v1/networth/assets
pub async fn add_asset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddAssetRequest>,
) -> ApiResult<(StatusCode, Json<NetWorthResponse>)> {
    let mut tracker = state.dashboard.networth();
    tracker.add_asset(&req.name, req.amount)?;
    Ok((StatusCode::CREATED, Json(snapshot(&tracker))))
}

/// DELETE /api/v1/networth/assets/:id
pub async fn remove_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<NetWorthResponse>> {
    let mut tracker = state.dashboard.networth();
    tracker.remove_asset(&id)?;
    Ok(Json(snapshot(&tracker)))
}

/// POST /api/v1/networth/transactions
///
/// Positive amounts are income, negative amounts are expenses.
pub async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddTransactionRequest>,
) -> ApiResult<(StatusCode, Json<NetWorthResponse>)> {
    let mut tracker = state.dashboard.networth();
    tracker.add_transaction(&req.name, req.amount)?;
    Ok((StatusCode::CREATED, Json(snapshot(&tracker))))
}
