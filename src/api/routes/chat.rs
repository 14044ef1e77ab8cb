//! Chat Routes
//!
//! - GET /api/v1/chat/:other - Conversation with another user
//! - POST /api/v1/chat/:other - Send a message

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ConversationResponse, SendMessageRequest};
use crate::api::error::ApiResult;
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;
use crate::widgets::chat::{ChatMessage, ConversationId};

/// GET /api/v1/chat/:other
///
/// Messages oldest first; empty for a conversation that never started.
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(other): Path<String>,
) -> ApiResult<Json<ConversationResponse>> {
    let messages = state.dashboard.chat().conversation(&me.uid, &other);

    Ok(Json(ConversationResponse {
        conversation_id: ConversationId::between(&me.uid, &other).to_string(),
        messages,
    }))
}

/// POST /api/v1/chat/:other
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    CurrentUser(me): CurrentUser,
    Path(other): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<ChatMessage>)> {
    let message = state.dashboard.chat().send(&me, &other, &req.text)?;
    Ok((StatusCode::CREATED, Json(message)))
}
