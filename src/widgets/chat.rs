//! Chat Widget
//!
//! One-to-one conversations between dashboard users. Each conversation is a
//! single stored array keyed by a [`ConversationId`] derived from the two
//! participants, so both sides read and write the same thread.
//!
//! # Storage
//!
//! ```text
//! chat:{conversation id} → [ChatMessage, ...]   (insertion order = chronological)
//! ```
//!
//! Every send rewrites the whole array for that conversation.

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, required, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uid: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }
}

/// Storage key for the conversation between two participants
///
/// The ids are sorted and encoded as `"{len(first)}:{first}_{second}"`. The
/// length prefix keeps the encoding unambiguous even when an id contains `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    /// Conversation between `a` and `b`, independent of argument order
    pub fn between(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}:{}_{}", first.len(), first, second))
    }

    /// Decode an encoded id
    pub fn parse(raw: &str) -> Option<Self> {
        let id = Self(raw.to_string());
        id.participants()?;
        Some(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two participant ids, in sorted order
    pub fn participants(&self) -> Option<(&str, &str)> {
        let (len, rest) = self.0.split_once(':')?;
        let len: usize = len.parse().ok()?;
        let first = rest.get(..len)?;
        let second = rest.get(len..)?.strip_prefix('_')?;
        Some((first, second))
    }

    /// Whether `uid` takes part in this conversation
    pub fn involves(&self, uid: &str) -> bool {
        self.participants()
            .map(|(a, b)| a == uid || b == uid)
            .unwrap_or(false)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub sender_email: String,
    pub timestamp: DateTime<Utc>,
}

/// Message store for all conversations
pub struct ChatService {
    ns: Namespace,
}

impl Widget for ChatService {
    const NAMESPACE: &'static str = "chat";

    fn reset(&mut self) {}
}

impl ChatService {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ns: Self::namespace(store),
        }
    }

    /// All messages between `me` and `other`, oldest first
    ///
    /// A conversation that was never written is empty.
    pub fn conversation(&self, me: &str, other: &str) -> Vec<ChatMessage> {
        let id = ConversationId::between(me, other);
        tracing::debug!(conversation = %id, "Loading conversation");
        self.ns.load_or_default(id.as_str())
    }

    /// Append a message from `me` to the conversation with `other`
    pub fn send(&self, me: &UserIdentity, other: &str, text: &str) -> WidgetResult<ChatMessage> {
        let text = required(text, "Message text")?;
        if other.trim().is_empty() {
            return Err(WidgetError::Validation("Recipient is required".to_string()));
        }

        let id = ConversationId::between(&me.uid, other);
        let mut messages: Vec<ChatMessage> = self.ns.load_or_default(id.as_str());

        // Clock skew must not reorder the thread
        let now = Utc::now();
        let timestamp = messages
            .last()
            .map(|last| last.timestamp.max(now))
            .unwrap_or(now);

        let message = ChatMessage {
            id: new_id(),
            text,
            sender_id: me.uid.clone(),
            sender_email: me.email.clone(),
            timestamp,
        };

        messages.push(message.clone());
        self.ns.save(id.as_str(), &messages)?;

        tracing::info!(
            conversation = %id,
            sender = %me.uid,
            length = messages.len(),
            "Message sent"
        );

        Ok(message)
    }

    /// Conversations `uid` takes part in
    pub fn conversations_for(&self, uid: &str) -> WidgetResult<Vec<ConversationId>> {
        Ok(self
            .ns
            .names()?
            .into_iter()
            .filter_map(|name| ConversationId::parse(&name))
            .filter(|id| id.involves(uid))
            .collect())
    }
}

/// A user that can be found in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub uid: String,
    pub email: String,
    pub name: String,
}

/// Fixed roster of users available to chat with
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<DirectoryUser>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        let roster = [
            ("user1", "john@example.com", "John Doe"),
            ("user2", "jane@example.com", "Jane Smith"),
            ("user3", "bob@example.com", "Bob Johnson"),
            ("user4", "alice@example.com", "Alice Brown"),
            ("user5", "mike@example.com", "Mike Wilson"),
        ];

        Self::new(
            roster
                .iter()
                .map(|(uid, email, name)| DirectoryUser {
                    uid: uid.to_string(),
                    email: email.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        )
    }
}

impl UserDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    /// Case-insensitive email substring search, excluding the caller
    pub fn search(&self, query: &str, current_email: &str) -> WidgetResult<Vec<DirectoryUser>> {
        let query = required(query, "Search email")?.to_lowercase();

        Ok(self
            .users
            .iter()
            .filter(|u| u.email.to_lowercase().contains(&query) && u.email != current_email)
            .cloned()
            .collect())
    }

    /// Everyone except the caller
    pub fn others(&self, current_email: &str) -> Vec<DirectoryUser> {
        self.users
            .iter()
            .filter(|u| u.email != current_email)
            .cloned()
            .collect()
    }

    pub fn find(&self, uid: &str) -> Option<&DirectoryUser> {
        self.users.iter().find(|u| u.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> (ChatService, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (ChatService::mount(Arc::clone(&store)), store)
    }

    #[test]
    fn test_conversation_id_is_symmetric() {
        let pairs = [("user1", "user2"), ("b", "a"), ("same", "same"), ("", "x")];
        for (a, b) in pairs {
            assert_eq!(ConversationId::between(a, b), ConversationId::between(b, a));
            assert_eq!(ConversationId::between(a, b), ConversationId::between(a, b));
        }
        assert_eq!(ConversationId::between("user2", "user1").as_str(), "5:user1_user2");
    }

    #[test]
    fn test_conversation_id_is_collision_proof() {
        // A plain sort+join would map both pairs to "a_b_c"
        let left = ConversationId::between("a_b", "c");
        let right = ConversationId::between("a", "b_c");
        assert_ne!(left, right);

        assert_eq!(left.participants(), Some(("a_b", "c")));
        assert_eq!(right.participants(), Some(("a", "b_c")));
    }

    #[test]
    fn test_conversation_id_parse() {
        assert!(ConversationId::parse("5:user1_user2").is_some());
        assert!(ConversationId::parse("garbage").is_none());
        assert!(ConversationId::parse("9:short_x").is_none());
    }

    #[test]
    fn test_unknown_conversation_is_empty() {
        let (chat, _) = service();
        assert!(chat.conversation("user1", "user2").is_empty());
    }

    #[test]
    fn test_send_appends_one_record() {
        let (chat, _) = service();
        let me = UserIdentity::new("user1", "john@example.com");

        let first = chat.send(&me, "user2", "  hello ").unwrap();
        assert_eq!(first.text, "hello");
        assert_eq!(first.sender_id, "user1");
        assert_eq!(first.sender_email, "john@example.com");

        let them = UserIdentity::new("user2", "jane@example.com");
        let second = chat.send(&them, "user1", "hi back").unwrap();

        let thread = chat.conversation("user2", "user1");
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0], first);
        assert_eq!(thread[1], second);
        assert!(thread[1].timestamp >= thread[0].timestamp);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let (chat, store) = service();
        let future = Utc::now() + chrono::Duration::hours(1);

        let seeded = vec![ChatMessage {
            id: "seed".to_string(),
            text: "from the future".to_string(),
            sender_id: "user2".to_string(),
            sender_email: "jane@example.com".to_string(),
            timestamp: future,
        }];
        let ns = ChatService::namespace(store);
        ns.save(ConversationId::between("user1", "user2").as_str(), &seeded)
            .unwrap();

        let me = UserIdentity::new("user1", "john@example.com");
        let sent = chat.send(&me, "user2", "now").unwrap();
        assert!(sent.timestamp >= future);
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let (chat, _) = service();
        let me = UserIdentity::new("user1", "john@example.com");

        assert!(matches!(
            chat.send(&me, "user2", "   "),
            Err(WidgetError::Validation(_))
        ));
        assert!(chat.conversation("user1", "user2").is_empty());
    }

    #[test]
    fn test_conversations_for() {
        let (chat, _) = service();
        let me = UserIdentity::new("user1", "john@example.com");
        chat.send(&me, "user2", "a").unwrap();
        chat.send(&me, "user3", "b").unwrap();

        let them = UserIdentity::new("user4", "alice@example.com");
        chat.send(&them, "user5", "c").unwrap();

        assert_eq!(chat.conversations_for("user1").unwrap().len(), 2);
        assert_eq!(chat.conversations_for("user5").unwrap().len(), 1);
    }

    #[test]
    fn test_directory_search_excludes_caller() {
        let dir = UserDirectory::default();

        let found = dir.search("EXAMPLE.com", "john@example.com").unwrap();
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|u| u.email != "john@example.com"));

        let found = dir.search("jane", "john@example.com").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Jane Smith");

        assert!(dir.search(" ", "john@example.com").is_err());
        assert_eq!(dir.others("nobody@example.com").len(), 5);
        assert_eq!(dir.find("user3").map(|u| u.name.as_str()), Some("Bob Johnson"));
    }
}
