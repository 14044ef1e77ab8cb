//! SMS Carrier API Widget
//!
//! Real text messages sent through an [`SmsProvider`], with an iMessage-style
//! contact list and one thread per phone number.
//!
//! # Send flow
//!
//! ```text
//! e164(phone) → SmsProvider::send (no locks held) → SmsInbox::record_outgoing
//! ```
//!
//! Replies reach [`SmsInbox::record_incoming`] through the inbound webhook
//! route; whoever receives the provider's callback posts them there.
//!
//! Provider credentials come from server configuration only. Nothing in this
//! module writes them to the store.

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::sms::digits;
use crate::widgets::{new_id, required, Widget, WidgetError, WidgetResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const BOOK_KEY: &str = "book";

/// Characters of the last message shown in a contact preview
pub const PREVIEW_CHARS: usize = 30;

pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";

/// E.164 form of a US number, `None` unless it has 10 digits or 11 with a
/// leading `1`
pub fn e164(phone: &str) -> Option<String> {
    let digits = digits(phone);
    match digits.len() {
        10 => Some(format!("+1{}", digits)),
        11 if digits.starts_with('1') => Some(format!("+{}", digits)),
        _ => None,
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Provider acknowledgement of an accepted message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReceipt {
    pub sid: String,
    pub status: String,
}

/// Outbound SMS transport
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Name for logs
    fn name(&self) -> &str;

    /// Send `body` to an E.164 number
    async fn send(&self, to: &str, body: &str) -> WidgetResult<ProviderReceipt>;
}

/// Credentials for the Twilio Messages API
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub base_url: String,
}

/// Twilio Messages REST API
pub struct TwilioProvider {
    client: Client,
    config: TwilioConfig,
}

impl TwilioProvider {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsProvider for TwilioProvider {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, to: &str, body: &str) -> WidgetResult<ProviderReceipt> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|e| WidgetError::Provider(format!("Network error: {}", e)))?;

        let status = response.status();

        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Failed to send SMS".to_string());
            return Err(WidgetError::Provider(format!("{} ({})", detail, status)));
        }

        response
            .json::<ProviderReceipt>()
            .await
            .map_err(|e| WidgetError::Provider(format!("Unreadable provider response: {}", e)))
    }
}

// ============================================================================
// Contacts and threads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub text: String,
    pub outgoing: bool,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Book {
    contacts: Vec<Contact>,
    threads: BTreeMap<String, Vec<ThreadMessage>>,
}

pub struct SmsInbox {
    ns: Namespace,
    book: Book,
}

impl Widget for SmsInbox {
    const NAMESPACE: &'static str = "sms_api";

    fn reset(&mut self) {
        self.book = Book::default();
    }
}

impl SmsInbox {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let book: Book = ns.load_or_default(BOOK_KEY);

        tracing::info!(contacts = book.contacts.len(), "SMS inbox mounted");
        Self { ns, book }
    }

    /// Validate an outgoing message, returning the E.164 recipient
    pub fn prepare(phone: &str, message: &str) -> WidgetResult<String> {
        if phone.trim().is_empty() || message.trim().is_empty() {
            return Err(WidgetError::Validation(
                "Please enter both phone number and message".to_string(),
            ));
        }
        e164(phone).ok_or_else(|| {
            WidgetError::Validation("Please enter a valid 10-digit phone number".to_string())
        })
    }

    /// Contacts, most recent conversation first
    pub fn contacts(&self) -> Vec<Contact> {
        let mut contacts = self.book.contacts.clone();
        contacts.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        contacts
    }

    /// Thread with `phone`, oldest first; empty when unknown
    pub fn thread(&self, phone: &str) -> Vec<ThreadMessage> {
        e164(phone)
            .and_then(|p| self.book.threads.get(&p).cloned())
            .unwrap_or_default()
    }

    /// Record a message the provider accepted
    pub fn record_outgoing(
        &mut self,
        phone: &str,
        text: &str,
        receipt: &ProviderReceipt,
    ) -> WidgetResult<ThreadMessage> {
        let message = ThreadMessage {
            id: new_id(),
            text: text.to_string(),
            outgoing: true,
            timestamp: Utc::now(),
            status: receipt.status.clone(),
            sid: Some(receipt.sid.clone()),
        };
        self.append(phone, message)
    }

    /// Record a message received from `phone`; bumps the contact's unread count
    pub fn record_incoming(&mut self, phone: &str, text: &str) -> WidgetResult<ThreadMessage> {
        let text = required(text, "Message")?;
        let message = ThreadMessage {
            id: new_id(),
            text,
            outgoing: false,
            timestamp: Utc::now(),
            status: "received".to_string(),
            sid: None,
        };
        self.append(phone, message)
    }

    pub fn mark_read(&mut self, phone: &str) -> WidgetResult<Contact> {
        let phone = e164(phone).ok_or_else(|| WidgetError::NotFound(format!("contact {}", phone)))?;

        let mut next = self.book.clone();
        let contact = next
            .contacts
            .iter_mut()
            .find(|c| c.phone == phone)
            .ok_or_else(|| WidgetError::NotFound(format!("contact {}", phone)))?;
        contact.unread_count = 0;
        let read = contact.clone();

        self.commit(next)?;
        Ok(read)
    }

    fn append(&mut self, phone: &str, message: ThreadMessage) -> WidgetResult<ThreadMessage> {
        let phone = e164(phone).ok_or_else(|| {
            WidgetError::Validation("Please enter a valid 10-digit phone number".to_string())
        })?;

        let mut next = self.book.clone();
        if !next.contacts.iter().any(|c| c.phone == phone) {
            let contact = Contact {
                id: new_id(),
                phone: phone.clone(),
                name: format!("Contact {}", next.contacts.len() + 1),
                last_message: String::new(),
                last_message_time: message.timestamp,
                unread_count: 0,
            };
            next.contacts.push(contact);
        }

        for contact in next.contacts.iter_mut().filter(|c| c.phone == phone) {
            contact.last_message = preview(&message.text);
            contact.last_message_time = message.timestamp;
            if !message.outgoing {
                contact.unread_count += 1;
            }
        }
        next.threads
            .entry(phone.clone())
            .or_default()
            .push(message.clone());

        self.commit(next)?;

        tracing::info!(
            phone = %phone,
            outgoing = message.outgoing,
            "SMS thread updated"
        );
        Ok(message)
    }

    fn commit(&mut self, next: Book) -> WidgetResult<()> {
        self.ns.save(BOOK_KEY, &next)?;
        self.book = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use axum::{http::StatusCode, routing::post, Form, Json, Router};
    use std::collections::HashMap;

    fn inbox() -> (SmsInbox, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (SmsInbox::mount(Arc::clone(&store)), store)
    }

    fn receipt() -> ProviderReceipt {
        ProviderReceipt {
            sid: "SM123".to_string(),
            status: "queued".to_string(),
        }
    }

    #[test]
    fn test_e164() {
        assert_eq!(e164("(555) 123-4567").as_deref(), Some("+15551234567"));
        assert_eq!(e164("1 555 123 4567").as_deref(), Some("+15551234567"));
        assert_eq!(e164("+15551234567").as_deref(), Some("+15551234567"));
        assert_eq!(e164("555123"), None);
    }

    #[test]
    fn test_prepare() {
        assert_eq!(SmsInbox::prepare("5551234567", "hi").unwrap(), "+15551234567");
        assert!(SmsInbox::prepare("5551234567", " ").is_err());
        assert!(SmsInbox::prepare("123", "hi").is_err());
    }

    #[test]
    fn test_outgoing_creates_contact() {
        let (mut inbox, store) = inbox();
        let long = "a".repeat(40);
        inbox.record_outgoing("5551234567", &long, &receipt()).unwrap();

        let contacts = inbox.contacts();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Contact 1");
        assert_eq!(contacts[0].phone, "+15551234567");
        assert_eq!(contacts[0].last_message, format!("{}...", "a".repeat(30)));
        assert_eq!(contacts[0].unread_count, 0);

        let thread = inbox.thread("+1 555 123 4567");
        assert_eq!(thread.len(), 1);
        assert!(thread[0].outgoing);
        assert_eq!(thread[0].sid.as_deref(), Some("SM123"));

        let remounted = SmsInbox::mount(store);
        assert_eq!(remounted.contacts(), contacts);
    }

    #[test]
    fn test_incoming_and_mark_read() {
        let (mut inbox, _) = inbox();
        inbox.record_outgoing("5551234567", "hi", &receipt()).unwrap();
        inbox.record_incoming("5551234567", "hey").unwrap();
        inbox.record_incoming("5551234567", "you there?").unwrap();

        assert_eq!(inbox.contacts()[0].unread_count, 2);
        assert_eq!(inbox.thread("5551234567").len(), 3);

        assert_eq!(inbox.mark_read("5551234567").unwrap().unread_count, 0);
        assert!(matches!(
            inbox.mark_read("5559999999"),
            Err(WidgetError::NotFound(_))
        ));
        assert!(matches!(
            inbox.record_incoming("5551234567", "  "),
            Err(WidgetError::Validation(_))
        ));
        assert_eq!(inbox.thread("5551234567").len(), 3);
    }

    #[test]
    fn test_contacts_sorted_by_recency() {
        let (mut inbox, _) = inbox();
        inbox.record_outgoing("5550000001", "one", &receipt()).unwrap();
        inbox.record_outgoing("5550000002", "two", &receipt()).unwrap();
        inbox.record_incoming("5550000001", "later").unwrap();

        let contacts = inbox.contacts();
        assert_eq!(contacts[0].phone, "+15550000001");
        assert_eq!(contacts[1].name, "Contact 2");
    }

    async fn mock_twilio(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/2010-04-01/Accounts/:sid/Messages.json",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let body = body.clone();
                async move {
                    assert_eq!(form.get("To").map(String::as_str), Some("+15551234567"));
                    assert_eq!(form.get("From").map(String::as_str), Some("+15550001111"));
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn twilio(base_url: String) -> TwilioProvider {
        TwilioProvider::new(TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15550001111".to_string(),
            base_url,
        })
    }

    #[tokio::test]
    async fn test_twilio_send() {
        let base = mock_twilio(
            StatusCode::CREATED,
            serde_json::json!({"sid": "SM42", "status": "queued"}),
        )
        .await;

        let receipt = twilio(base).send("+15551234567", "hello").await.unwrap();
        assert_eq!(receipt.sid, "SM42");
        assert_eq!(receipt.status, "queued");
    }

    #[tokio::test]
    async fn test_twilio_error_surfaces_message() {
        let base = mock_twilio(
            StatusCode::BAD_REQUEST,
            serde_json::json!({"message": "Invalid From number"}),
        )
        .await;

        let err = twilio(base).send("+15551234567", "hello").await.unwrap_err();
        assert!(matches!(err, WidgetError::Provider(_)));
        assert!(err.to_string().contains("Invalid From number"));
    }
}
