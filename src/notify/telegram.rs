//! Telegram Bot API notifier
//!
//! Delivers booking reports through a Telegram bot. Only two Bot API
//! methods are needed: `getMe` to verify the token at startup and
//! `sendMessage` for the actual traffic.

use crate::config::TelegramConfig;
use crate::error::{Result, SlotwatchError};
use crate::notify::Notifier;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Bot API base, overridable through config for tests
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Timeout for notification requests in seconds
const NOTIFY_TIMEOUT_SECS: u64 = 30;

/// Payload for the `sendMessage` method
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Envelope every Bot API response arrives in
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// Bot identity returned by `getMe`
#[derive(Debug, Default, Deserialize)]
struct BotProfile {
    username: String,
}

/// Telegram notification channel
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_ids: Vec<i64>,
    api_base: String,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    ///
    /// # Arguments
    ///
    /// * `config` - Telegram configuration with token and recipients
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(NOTIFY_TIMEOUT_SECS))
            .user_agent("slotwatch/0.2.0")
            .build()
            .map_err(|e| SlotwatchError::Notify(format!("Failed to create HTTP client: {}", e)))?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        tracing::info!(
            "Initialized Telegram notifier: recipients={}",
            config.chat_ids.len()
        );

        Ok(Self {
            client,
            token: config.token.clone(),
            chat_ids: config.chat_ids.clone(),
            api_base,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    /// Verify the bot token by asking the API who the bot is
    ///
    /// # Returns
    ///
    /// Returns the bot's username on success
    pub async fn verify(&self) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint("getMe"))
            .send()
            .await
            .map_err(SlotwatchError::Http)?;

        let status = response.status();
        let body: ApiResponse<BotProfile> =
            response.json().await.map_err(SlotwatchError::Http)?;

        if !body.ok {
            let reason = body.description.unwrap_or_else(|| status.to_string());
            return Err(
                SlotwatchError::Notify(format!("Telegram rejected the bot token: {}", reason))
                    .into(),
            );
        }

        let profile = body.result.ok_or_else(|| {
            SlotwatchError::Notify("getMe returned no bot profile".to_string())
        })?;
        tracing::info!("Authorized on account {}", profile.username);

        Ok(profile.username)
    }

    async fn send_to(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("sendMessage"))
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(SlotwatchError::Http)?;

        let status = response.status();
        let body: ApiResponse<serde_json::Value> =
            response.json().await.map_err(SlotwatchError::Http)?;

        if !body.ok {
            let reason = body.description.unwrap_or_else(|| status.to_string());
            return Err(SlotwatchError::Notify(format!(
                "sendMessage to chat {} failed: {}",
                chat_id, reason
            ))
            .into());
        }

        tracing::debug!(chat_id = chat_id, "Notification delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let sends = self.chat_ids.iter().map(|&chat_id| self.send_to(chat_id, text));
        let outcomes = join_all(sends).await;

        let total = outcomes.len();
        let mut failed = 0;
        for outcome in outcomes {
            if let Err(e) = outcome {
                failed += 1;
                tracing::warn!(error = %e, "Notification delivery failed");
            }
        }

        if failed > 0 {
            return Err(SlotwatchError::Notify(format!(
                "delivery failed for {} of {} chats",
                failed, total
            ))
            .into());
        }

        Ok(())
    }
}
