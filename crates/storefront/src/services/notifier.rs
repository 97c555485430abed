//! Order notification sink client.
//!
//! Placed orders are announced by POSTing `{"chat_id", "text"}` to a chat
//! webhook (a Telegram-style `sendMessage` endpoint). The endpoint, chat id
//! and timeout come from [`OrderConfig`].

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::OrderConfig;

/// Errors delivering an order notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The sink did not answer within the configured timeout.
    #[error("notification timed out")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("notification request failed: {0}")]
    Request(String),

    /// The sink answered with a non-success status.
    #[error("notification rejected with status {status}")]
    Rejected { status: u16 },
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            // Strip the URL: it carries the bot token.
            Self::Request(err.without_url().to_string())
        }
    }
}

/// Destination for placed-order summaries.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Deliver one order summary. Only `Ok` means the order was accepted.
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// JSON body of a notification request.
#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Notifier that POSTs to a chat webhook.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    endpoint: SecretString,
    chat_id: String,
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("endpoint", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl WebhookNotifier {
    /// Create a notifier whose requests are bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &OrderConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(config.webhook_timeout)
            .connect_timeout(config.webhook_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.webhook_url.clone(),
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl OrderNotifier for WebhookNotifier {
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id))]
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let payload = NotificationPayload {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.endpoint.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Order notification rejected");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!("Order notification delivered");
        Ok(())
    }
}
