//! GroupMe message publishing

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// GroupMe rejects messages over this many characters
const MESSAGE_CHAR_LIMIT: usize = 1000;
/// Pause between chunks so multi-part recaps arrive in order
const CHUNK_DELAY: Duration = Duration::from_millis(300);

/// Errors from message publishing
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GroupMe API error: {status} - {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct BotPostPayload<'a> {
    bot_id: &'a str,
    text: &'a str,
}

/// Publisher for sending recaps to GroupMe groups via bot
#[derive(Debug, Clone)]
pub struct GroupMePublisher {
    base_url: String,
    client: reqwest::Client,
}

impl GroupMePublisher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), client: reqwest::Client::new() }
    }

    /// Send a single message through a bot. The API acknowledges with 202.
    pub async fn publish(&self, bot_id: &str, text: &str) -> Result<(), PublishError> {
        let url = format!("{}/bots/post", self.base_url);
        let payload = BotPostPayload { bot_id, text };

        let response = self.client.post(&url).json(&payload).send().await?;

        if response.status() != reqwest::StatusCode::ACCEPTED {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api { status, body });
        }

        Ok(())
    }

    /// Send a message of any length, chunked to the GroupMe limit
    pub async fn send_long_message(&self, bot_id: &str, text: &str) -> Result<(), PublishError> {
        let chunks = split_message(text, MESSAGE_CHAR_LIMIT);
        let total = chunks.len();

        for (index, chunk) in chunks.iter().enumerate() {
            self.publish(bot_id, chunk).await?;
            if index + 1 < total {
                tokio::time::sleep(CHUNK_DELAY).await;
            }
        }

        info!("Published {total}-part message to GroupMe bot {bot_id}");
        Ok(())
    }

    /// Send with retry on transient failures
    pub async fn send_with_retry(
        &self,
        bot_id: &str,
        text: &str,
        max_retries: u32,
        delay: Duration,
    ) -> Result<(), PublishError> {
        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.send_long_message(bot_id, text).await {
                Ok(()) => return Ok(()),
                Err(error) => {
                    warn!("Publish attempt {attempt} failed: {error}");
                    last_error = Some(error);
                    if attempt < max_retries {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.expect("at least one attempt"))
    }
}

/// Split text into chunks of at most `limit` characters, preferring line
/// boundaries. A single line longer than the limit is hard-split.
fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if line_len > limit {
            // Flush, then hard-split the oversized line
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut buffer = String::new();
            let mut buffer_len = 0usize;
            for c in line.chars() {
                if buffer_len == limit {
                    chunks.push(std::mem::take(&mut buffer));
                    buffer_len = 0;
                }
                buffer.push(c);
                buffer_len += 1;
            }
            current = buffer;
            current_len = buffer_len;
            continue;
        }

        // +1 for the newline separator
        let needed = if current_len == 0 { line_len } else { line_len + 1 };
        if current_len + needed > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
