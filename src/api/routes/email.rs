//! Email Routes
//!
//! - POST /api/v1/email - Validate and simulate sending an email

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::SendEmailRequest;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::email::EmailReceipt;

/// POST /api/v1/email
///
/// Responds after the simulated send delay.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendEmailRequest>,
) -> ApiResult<Json<EmailReceipt>> {
    let receipt = state.dashboard.send_email(&req.to, &req.message).await?;
    Ok(Json(receipt))
}
