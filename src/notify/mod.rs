//! Notification channels for booking outcomes
//!
//! This module defines the notifier trait that the watch loop reports
//! through, plus the Telegram implementation used in production.

pub mod telegram;

pub use telegram::TelegramNotifier;

use crate::error::Result;
use async_trait::async_trait;

/// Outbound notification channel
///
/// Implementations deliver one text message to every configured recipient.
/// Delivery is best-effort per recipient: a failure for one recipient must
/// not prevent attempts to the others.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message to all recipients
    ///
    /// # Arguments
    ///
    /// * `text` - Message body, already fully formatted
    ///
    /// # Returns
    ///
    /// Returns Ok when every recipient accepted the message, or an error
    /// describing how many deliveries failed
    async fn notify(&self, text: &str) -> Result<()>;
}
