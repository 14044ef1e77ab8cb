//! Provider SMS Routes
//!
//! - GET /api/v1/sms-api/contacts - Contacts, most recent first
//! - GET /api/v1/sms-api/threads/:phone - Conversation with one number
//! - POST /api/v1/sms-api/send - Send through the configured provider
//! - POST /api/v1/sms-api/threads/:phone/incoming - Record a reply
//! - POST /api/v1/sms-api/contacts/:phone/read - Clear the unread count

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ContactListResponse, IncomingSmsRequest, SendSmsRequest, ThreadResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::widgets::sms_api::{Contact, ThreadMessage};

/// GET /api/v1/sms-api/contacts
pub async fn list_contacts(State(state): State<Arc<AppState>>) -> Json<ContactListResponse> {
    Json(ContactListResponse {
        configured: state.dashboard.has_sms_provider(),
        contacts: state.dashboard.sms_inbox().contacts(),
    })
}

/// GET /api/v1/sms-api/threads/:phone
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> Json<ThreadResponse> {
    let messages = state.dashboard.sms_inbox().thread(&phone);
    Json(ThreadResponse { phone, messages })
}

/// POST /api/v1/sms-api/send
///
/// 502 when the provider rejects the message or is not configured.
pub async fn send(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendSmsRequest>,
) -> ApiResult<(StatusCode, Json<ThreadMessage>)> {
    let message = state
        .dashboard
        .send_sms(&req.phone_number, &req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/v1/sms-api/threads/:phone/incoming
///
/// Creates the contact on first contact and bumps its unread count.
pub async fn record_incoming(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    Json(req): Json<IncomingSmsRequest>,
) -> ApiResult<(StatusCode, Json<ThreadMessage>)> {
    let message = state.dashboard.sms_inbox().record_incoming(&phone, &req.text)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/v1/sms-api/contacts/:phone/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> ApiResult<Json<Contact>> {
    let contact = state.dashboard.sms_inbox().mark_read(&phone)?;
    Ok(Json(contact))
}
