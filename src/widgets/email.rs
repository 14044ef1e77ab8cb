//! Email widget: address validation and a simulated send.

use crate::widgets::{WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub const SENT_MESSAGE: &str = "Email sent successfully!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailReceipt {
    pub to: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EmailComposer {
    delay: Duration,
}

impl EmailComposer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn validate(&self, address: &str, message: &str) -> WidgetResult<()> {
        if address.trim().is_empty() || message.trim().is_empty() {
            return Err(WidgetError::Validation(
                "Please fill in both email address and message.".to_string(),
            ));
        }

        let re = regex::Regex::new(EMAIL_PATTERN)
            .map_err(|e| WidgetError::Validation(format!("Email pattern error: {}", e)))?;
        if !re.is_match(address.trim()) {
            return Err(WidgetError::Validation(
                "Please enter a valid email address.".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate, then simulate delivery
    pub async fn send(&self, address: &str, message: &str) -> WidgetResult<EmailReceipt> {
        self.validate(address, message)?;

        tracing::debug!(to = %address.trim(), delay_ms = self.delay.as_millis() as u64, "Sending email");
        tokio::time::sleep(self.delay).await;

        tracing::info!(to = %address.trim(), chars = message.len(), "Email sent");
        Ok(EmailReceipt {
            to: address.trim().to_string(),
            status: SENT_MESSAGE.to_string(),
            sent_at: Utc::now(),
        })
    }
}
