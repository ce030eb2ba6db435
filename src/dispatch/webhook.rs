use async_trait::async_trait;
use log::debug;
use log::info;
use serde_json::json;

use super::DispatchError;
use super::Dispatcher;

/// Delivers rendered messages by POSTing to a chat webhook endpoint.
pub struct WebhookDispatcher {
    pub webhook_url: String,
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn new(webhook_url: String) -> Self {
        info!("Initializing WebhookDispatcher.");
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Dispatcher for WebhookDispatcher {
    async fn dispatch(&self, subscriber_id: i64, text: &str) -> Result<(), DispatchError> {
        debug!("Dispatching message to subscriber {subscriber_id}.");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({
                "chat_id": subscriber_id,
                "text": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                subscriber_id,
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
