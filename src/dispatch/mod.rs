//! Message dispatch toward the chat transport.
//!
//! Evaluators are the only callers of [`Dispatcher`] and the only parties
//! permitted to react to its result; dedup timestamps are written after a
//! confirmed success, never before.

use async_trait::async_trait;

pub mod webhook;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("Transport request failed: {0}")]
    TransportFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Delivery to subscriber {subscriber_id} rejected with status {status}.")]
    Rejected { subscriber_id: i64, status: u16 },
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        DispatchError::TransportFailed(Box::new(e))
    }
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, subscriber_id: i64, text: &str) -> Result<(), DispatchError>;
}
