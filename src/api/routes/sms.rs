//! Carrier Gateway SMS Routes
//!
//! - GET /api/v1/sms/carriers - Supported carriers and quick templates
//! - GET /api/v1/sms/history - Composed messages, newest first
//! - POST /api/v1/sms - Compose a gateway email for a phone
//! - DELETE /api/v1/sms/history - Forget composed messages

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{
    CarrierListResponse, CarrierResponse, ClearedResponse, ComposeSmsRequest, SmsHistoryResponse,
};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::sms::{ComposedSms, CARRIERS, QUICK_TEMPLATES};

/// GET /api/v1/sms/carriers
pub async fn list_carriers() -> Json<CarrierListResponse> {
    Json(CarrierListResponse {
        carriers: CARRIERS.iter().map(CarrierResponse::from).collect(),
        templates: QUICK_TEMPLATES.to_vec(),
    })
}

/// GET /api/v1/sms/history
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<SmsHistoryResponse> {
    let messages = state.dashboard.sms().history().to_vec();
    Json(SmsHistoryResponse {
        total: messages.len(),
        messages,
    })
}

/// POST /api/v1/sms
///
/// Nothing is sent; the response carries the `mailto:` link for the caller.
pub async fn compose(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ComposeSmsRequest>,
) -> ApiResult<(StatusCode, Json<ComposedSms>)> {
    let composed = state
        .dashboard
        .sms()
        .compose(&req.phone_number, &req.carrier, &req.message)?;
    Ok((StatusCode::CREATED, Json(composed)))
}

/// DELETE /api/v1/sms/history
pub async fn clear_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<ClearedResponse>> {
    let cleared = state.dashboard.sms().clear_history()?;
    Ok(Json(ClearedResponse { cleared }))
}
