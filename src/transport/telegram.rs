use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::{ChatTransport, RawMessage, TransportError};
use crate::config::TelegramConfig;
use crate::rate_limiter::TokenBucket;

const SEND_BURST: usize = 20;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    channel_post: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

/// Text messages carried by a batch of updates, and the offset acknowledging them.
pub(crate) fn messages_from_updates(updates: Vec<Update>) -> (Vec<RawMessage>, Option<i64>) {
    let next_offset = updates.iter().map(|u| u.update_id + 1).max();
    let messages = updates
        .into_iter()
        .filter_map(|u| u.channel_post.or(u.message))
        .filter_map(|m| {
            let text = m.text.or(m.caption)?;
            Some(RawMessage {
                source_channel_id: m.chat.id,
                text,
            })
        })
        .collect();
    (messages, next_offset)
}

/// Telegram Bot API client: long-polls `getUpdates` and posts with `sendMessage`.
pub struct TelegramBotClient {
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
    offset: AtomicI64,
    send_limiter: TokenBucket,
}

impl TelegramBotClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                TransportError::Config(
                    "telegram.bot_token not set (check config or TELEGRAM_BOT_TOKEN)".to_string(),
                )
            })?;

        if !config.send_rate_per_sec.is_finite() || config.send_rate_per_sec <= 0.0 {
            return Err(TransportError::Config(format!(
                "telegram.send_rate_per_sec must be positive, got {}",
                config.send_rate_per_sec
            )));
        }

        let client = Client::builder()
            // Long polling holds the request open for poll_timeout_secs.
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_base.trim_end_matches('/'), token),
            poll_timeout_secs: config.poll_timeout_secs,
            offset: AtomicI64::new(0),
            send_limiter: TokenBucket::new(SEND_BURST, config.send_rate_per_sec),
        })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = format!("{}/{}", self.base_url, method);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            // without_url keeps the bot token out of logs
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        decode_envelope(method, status.as_u16(), &text)
    }
}

/// Unwrap the Bot API `{ok, result, description}` envelope.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    method: &str,
    status: u16,
    text: &str,
) -> Result<T, TransportError> {
    let parsed: ApiResponse<T> = serde_json::from_str(text)
        .map_err(|e| TransportError::Decode(format!("{} response ({}): {}", method, status, e)))?;

    if !parsed.ok {
        return Err(TransportError::Api(format!(
            "{} failed {}: {}",
            method,
            status,
            parsed.description.unwrap_or_default()
        )));
    }

    parsed
        .result
        .ok_or_else(|| TransportError::Decode(format!("{} response without result", method)))
}

#[async_trait]
impl ChatTransport for TelegramBotClient {
    async fn poll(&self) -> Result<Vec<RawMessage>, TransportError> {
        let request = GetUpdates {
            offset: self.offset.load(Ordering::SeqCst),
            timeout: self.poll_timeout_secs,
            allowed_updates: &["message", "channel_post"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;

        let (messages, next_offset) = messages_from_updates(updates);
        if let Some(next) = next_offset {
            self.offset.fetch_max(next, Ordering::SeqCst);
        }
        debug!(count = messages.len(), "Telegram updates received");
        Ok(messages)
    }

    async fn post(&self, channel_id: i64, text: &str) -> Result<(), TransportError> {
        self.send_limiter.acquire().await;

        let request = SendMessage {
            chat_id: channel_id,
            text,
            parse_mode: "Markdown",
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
