//! Optional LLM prose rewriting
//!
//! A decorator over the deterministic renderer: build the deterministic
//! text first, then ask a model to restyle it with a persona. Any failure
//! falls back to the deterministic text, so recaps never depend on the
//! model being reachable.

use crate::deterministic::{render, RecapStyle};
use crate::error::RewriteError;
use recap_engine::WeeklySummary;
use serde::{Deserialize, Serialize};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are a fantasy sports expert who writes engaging recaps for league group chats.";

/// A client that can restyle deterministic recap text
#[async_trait::async_trait]
pub trait ProseRewriter: Send + Sync {
    async fn rewrite(&self, base_text: &str, persona: &str) -> Result<String, RewriteError>;
}

/// Instruction text for a rewrite persona
fn persona_instruction(persona: &str) -> &'static str {
    match persona {
        "witty" => {
            "Rewrite this fantasy recap with wit, humor, and clever observations. Use puns, \
             jokes, and playful roasting of teams. Keep it fun and entertaining."
        }
        "professional" => {
            "Rewrite this fantasy recap in a professional sports journalism style. Use proper \
             analysis, statistics, and formal language."
        }
        "roastmaster" => {
            "Rewrite this fantasy recap with savage roasts and trash talk. Really go after the \
             losing teams and bad performances. Be brutal but funny."
        }
        "hype" => {
            "Rewrite this fantasy recap with maximum energy and excitement. Use lots of caps, \
             exclamation points, and hype up everything. Make it feel like a highlight reel."
        }
        "analyst" => {
            "Rewrite this fantasy recap with deep fantasy analysis and insights. Focus on \
             trends, predictions, and strategic observations."
        }
        _ => "Rewrite this fantasy recap in an engaging, entertaining style.",
    }
}

/// Build the full rewrite prompt for a persona
pub fn build_rewrite_prompt(base_text: &str, persona: &str) -> String {
    format!(
        "{}\n\nKeep the same factual information but make it more engaging. The recap should \
         be 200-400 words and formatted for a group chat message.\n\nOriginal recap:\n{}\n\n\
         Rewritten recap:",
        persona_instruction(persona),
        base_text
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-backed rewriter
pub struct OpenAiRewriter {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiRewriter {
    pub fn new(api_key: String, model: String) -> Self {
        Self { client: reqwest::Client::new(), api_key, model }
    }
}

#[async_trait::async_trait]
impl ProseRewriter for OpenAiRewriter {
    async fn rewrite(&self, base_text: &str, persona: &str) -> Result<String, RewriteError> {
        let prompt = build_rewrite_prompt(base_text, persona);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            max_tokens: 500,
            temperature: 0.8,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RewriteError::Api(format!("{status}: {body}")));
        }

        let parsed: ChatResponse =
            response.json().await.map_err(RewriteError::Http)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(RewriteError::EmptyResponse)?;

        Ok(content)
    }
}

/// Render a summary, restyling through `rewriter` when one is configured.
///
/// Falls back to the deterministic text when no rewriter is given or the
/// rewrite fails.
pub async fn render_with_rewriter(
    summary: &WeeklySummary,
    style: RecapStyle,
    persona: &str,
    rewriter: Option<&dyn ProseRewriter>,
) -> String {
    let base_text = render(summary, style);

    match rewriter {
        Some(rewriter) => match rewriter.rewrite(&base_text, persona).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!("Prose rewrite failed, using deterministic text: {error}");
                base_text
            }
        },
        None => base_text,
    }
}
