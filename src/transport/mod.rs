//! Chat transport collaborator: delivers raw channel messages and posts confirmations.

pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

pub use telegram::TelegramBotClient;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A text message from a chat channel. Only lives for the handling of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub source_channel_id: i64,
    pub text: String,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Wait for the next batch of inbound messages. May return an empty batch.
    async fn poll(&self) -> Result<Vec<RawMessage>, TransportError>;

    /// Post a message to a channel.
    async fn post(&self, channel_id: i64, text: &str) -> Result<(), TransportError>;

    fn name(&self) -> &str;
}
