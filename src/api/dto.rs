//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::widgets::chat::{ChatMessage, DirectoryUser};
use crate::widgets::clone::{CloneStats, CloneTaskView};
use crate::widgets::employees::{Employee, EmployeeStats};
use crate::widgets::mood::{MoodEntry, MoodKind, MoodStats};
use crate::widgets::movies::Movie;
use crate::widgets::networth::{Asset, NetWorthSummary, Transaction};
use crate::widgets::photos::PhotoRecord;
use crate::widgets::shopping::{PriorityBand, ShoppingItem};
use crate::widgets::sms::{Carrier, SmsRecord};
use crate::widgets::sms_api::{Contact, ThreadMessage};

// ============================================
// USER & CHAT DTOs
// ============================================

/// User search query (`?q=`)
#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub total: usize,
    pub users: Vec<DirectoryUser>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub messages: Vec<ChatMessage>,
}

// ============================================
// PHOTO DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct PhotoListResponse {
    pub total: usize,
    pub photos: Vec<PhotoRecord>,
}

// ============================================
// SHOPPING DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
}

/// Shopping item with its derived display band
#[derive(Debug, Serialize)]
pub struct ShoppingItemResponse {
    #[serde(flatten)]
    pub item: ShoppingItem,
    pub band: PriorityBand,
}

impl From<ShoppingItem> for ShoppingItemResponse {
    fn from(item: ShoppingItem) -> Self {
        Self {
            band: item.band(),
            item,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub total: usize,
    pub items: Vec<ShoppingItemResponse>,
}

impl ShoppingListResponse {
    pub fn new(items: &[ShoppingItem]) -> Self {
        Self {
            total: items.len(),
            items: items.iter().cloned().map(ShoppingItemResponse::from).collect(),
        }
    }
}

/// Result of a move; `moved` is false at the list boundaries
#[derive(Debug, Serialize)]
pub struct MoveItemResponse {
    pub moved: bool,
    #[serde(flatten)]
    pub list: ShoppingListResponse,
}

// ============================================
// MOOD DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct RecordMoodRequest {
    pub mood: MoodKind,
}

#[derive(Debug, Serialize)]
pub struct RecordMoodResponse {
    pub entry: MoodEntry,
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct MoodHistoryResponse {
    pub history: Vec<MoodEntry>,
    pub stats: Option<MoodStats>,
}

// ============================================
// NET WORTH DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct AddAssetRequest {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddTransactionRequest {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct NetWorthResponse {
    #[serde(flatten)]
    pub summary: NetWorthSummary,
    pub assets: Vec<Asset>,
    pub transactions: Vec<Transaction>,
}

// ============================================
// SIMULATION DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<Employee>,
    pub stats: EmployeeStats,
}

#[derive(Debug, Serialize)]
pub struct CloneBoardResponse {
    pub tasks: Vec<CloneTaskView>,
    pub active_task: Option<u32>,
    pub stats: CloneStats,
}

// ============================================
// MOVIE DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub title: String,
}

/// `null` clears the rating
#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub rating: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub total: usize,
    pub movies: Vec<Movie>,
}

// ============================================
// SMS DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct CarrierResponse {
    pub name: &'static str,
    pub gateway: &'static str,
    pub format: String,
}

impl From<&Carrier> for CarrierResponse {
    fn from(carrier: &Carrier) -> Self {
        Self {
            name: carrier.name,
            gateway: carrier.gateway,
            format: carrier.format_hint(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CarrierListResponse {
    pub carriers: Vec<CarrierResponse>,
    pub templates: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct ComposeSmsRequest {
    pub phone_number: String,
    pub carrier: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SmsHistoryResponse {
    pub total: usize,
    pub messages: Vec<SmsRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub phone_number: String,
    pub message: String,
}

/// Inbound message forwarded from the provider's webhook
#[derive(Debug, Deserialize)]
pub struct IncomingSmsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    /// Whether a provider is configured on the server
    pub configured: bool,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub phone: String,
    pub messages: Vec<ThreadMessage>,
}

// ============================================
// EMAIL DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub message: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy", "degraded", or "unhealthy"
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Deferred task scheduler status
    pub scheduler: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Service version
    pub version: String,
}
