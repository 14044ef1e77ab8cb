//! SMS Gateway Widget
//!
//! Composes text messages for delivery through a carrier's email-to-SMS
//! gateway. Nothing is sent from here: the result is the gateway address and
//! a `mailto:` link for the user's mail client. Composed messages are kept in
//! a history capped at [`HISTORY_LIMIT`], newest first.

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const HISTORY_KEY: &str = "history";

pub const HISTORY_LIMIT: usize = 50;

const SUBJECT: &str = "SMS Message";

/// A carrier and its email-to-SMS gateway domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Carrier {
    pub name: &'static str,
    pub gateway: &'static str,
}

pub const CARRIERS: [Carrier; 9] = [
    Carrier {
        name: "AT&T",
        gateway: "txt.att.net",
    },
    Carrier {
        name: "Verizon",
        gateway: "vtext.com",
    },
    Carrier {
        name: "T-Mobile",
        gateway: "tmomail.net",
    },
    Carrier {
        name: "Sprint",
        gateway: "messaging.sprintpcs.com",
    },
    Carrier {
        name: "US Cellular",
        gateway: "email.uscc.net",
    },
    Carrier {
        name: "Boost Mobile",
        gateway: "myboostmobile.com",
    },
    Carrier {
        name: "Cricket",
        gateway: "sms.cricketwireless.net",
    },
    Carrier {
        name: "MetroPCS",
        gateway: "mymetropcs.com",
    },
    Carrier {
        name: "Virgin Mobile",
        gateway: "vmobl.com",
    },
];

pub const QUICK_TEMPLATES: [&str; 6] = [
    "Hey! How are you?",
    "Can you call me when you get a chance?",
    "Running late, be there in 10 minutes",
    "Thanks for everything!",
    "See you tomorrow",
    "Call me back when you can",
];

impl Carrier {
    pub fn find(name: &str) -> Option<&'static Carrier> {
        CARRIERS.iter().find(|c| c.name == name)
    }

    /// Example address for display
    pub fn format_hint(&self) -> String {
        format!("5551234567@{}", self.gateway)
    }
}

/// Strip everything but digits
pub fn digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Ten-digit national number, `None` unless the input has 10 digits or 11
/// digits with a leading `1`
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits = digits(phone);
    match digits.len() {
        10 => Some(digits),
        11 if digits.starts_with('1') => Some(digits[1..].to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsRecord {
    pub id: String,
    pub phone_number: String,
    pub carrier: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

/// A message ready to hand to a mail client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedSms {
    pub address: String,
    pub mailto: String,
    pub record: SmsRecord,
}

pub struct SmsGateway {
    ns: Namespace,
    history: Vec<SmsRecord>,
}

impl Widget for SmsGateway {
    const NAMESPACE: &'static str = "sms";

    fn reset(&mut self) {
        self.history.clear();
    }
}

impl SmsGateway {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let mut history: Vec<SmsRecord> = ns.load_or_default(HISTORY_KEY);
        history.truncate(HISTORY_LIMIT);

        tracing::info!(messages = history.len(), "SMS gateway mounted");
        Self { ns, history }
    }

    pub fn history(&self) -> &[SmsRecord] {
        &self.history
    }

    pub fn compose(&mut self, phone: &str, carrier: &str, message: &str) -> WidgetResult<ComposedSms> {
        if phone.trim().is_empty() || message.trim().is_empty() {
            return Err(WidgetError::Validation(
                "Please enter both phone number and message".to_string(),
            ));
        }
        let phone_number = normalize_phone(phone).ok_or_else(|| {
            WidgetError::Validation("Please enter a valid 10-digit phone number".to_string())
        })?;
        let carrier = Carrier::find(carrier)
            .ok_or_else(|| WidgetError::Validation("Please select a carrier".to_string()))?;

        let address = format!("{}@{}", phone_number, carrier.gateway);
        let mailto = format!(
            "mailto:{}?subject={}&body={}",
            address,
            urlencoding::encode(SUBJECT),
            urlencoding::encode(message)
        );

        let record = SmsRecord {
            id: new_id(),
            phone_number,
            carrier: carrier.name.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            status: "sent".to_string(),
        };

        let mut next = Vec::with_capacity(HISTORY_LIMIT);
        next.push(record.clone());
        next.extend(self.history.iter().take(HISTORY_LIMIT - 1).cloned());
        self.ns.save(HISTORY_KEY, &next)?;
        self.history = next;

        tracing::info!(carrier = carrier.name, address = %address, "SMS composed");
        Ok(ComposedSms {
            address,
            mailto,
            record,
        })
    }

    pub fn clear_history(&mut self) -> WidgetResult<usize> {
        let cleared = self.history.len();
        self.ns.save(HISTORY_KEY, &Vec::<SmsRecord>::new())?;
        self.history.clear();

        tracing::info!(cleared, "SMS history cleared");
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn gateway() -> SmsGateway {
        SmsGateway::mount(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(555) 123-4567").as_deref(), Some("5551234567"));
        assert_eq!(normalize_phone("1-555-123-4567").as_deref(), Some("5551234567"));
        assert_eq!(normalize_phone("25551234567"), None);
        assert_eq!(normalize_phone("555-1234"), None);
    }

    #[test]
    fn test_compose() {
        let mut sms = gateway();
        let composed = sms
            .compose("+1 (555) 123-4567", "Verizon", "Running late & sorry")
            .unwrap();

        assert_eq!(composed.address, "5551234567@vtext.com");
        assert_eq!(
            composed.mailto,
            "mailto:5551234567@vtext.com?subject=SMS%20Message&body=Running%20late%20%26%20sorry"
        );
        assert_eq!(composed.record.status, "sent");
        assert_eq!(sms.history()[0], composed.record);
    }

    #[test]
    fn test_compose_validation() {
        let mut sms = gateway();
        assert!(sms.compose("", "Verizon", "hi").is_err());
        assert!(sms.compose("5551234567", "Verizon", " ").is_err());
        assert!(sms.compose("12345", "Verizon", "hi").is_err());

        let err = sms.compose("5551234567", "Carrier Pigeon", "hi").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Please select a carrier");
        assert!(sms.history().is_empty());
    }

    #[test]
    fn test_history_cap_and_clear() {
        let mut sms = gateway();
        for i in 0..(HISTORY_LIMIT + 5) {
            sms.compose("5551234567", "AT&T", &format!("msg {}", i)).unwrap();
        }
        assert_eq!(sms.history().len(), HISTORY_LIMIT);
        assert_eq!(sms.history()[0].message, format!("msg {}", HISTORY_LIMIT + 4));

        assert_eq!(sms.clear_history().unwrap(), HISTORY_LIMIT);
        assert!(sms.history().is_empty());
    }

    #[test]
    fn test_carrier_catalog() {
        assert_eq!(CARRIERS.len(), 9);
        assert_eq!(
            Carrier::find("Cricket").map(|c| c.format_hint()),
            Some("5551234567@sms.cricketwireless.net".to_string())
        );
    }
}
