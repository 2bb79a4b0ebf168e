use crate::backend::traits::CaptionSynthesis;
use crate::config::{CredentialProvider, OpenAiConfig};
use crate::models::CaptionOutcome;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

const API_KEY_NAME: &str = "OPENAI_API_KEY";

const SYSTEM_INSTRUCTION: &str = "You are a creative ad copywriter. Produce a short, punchy \
marketing caption (<= 15 words) suitable for social media ad. No hashtags.";

const MAX_COMPLETION_TOKENS: u32 = 30;
const TEMPERATURE: f32 = 0.8;

/// Words kept by the truncation fallback.
pub const FALLBACK_WORD_LIMIT: usize = 10;

/// Why a primary caption attempt failed. Absorbed into the fallback and
/// never surfaced past the client; logged at debug level only.
#[derive(Debug, Error)]
enum CaptionFailure {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend rejected request ({status}): {body}")]
    BackendRejected { status: u16, body: String },
    #[error("malformed completion: {0}")]
    MalformedResponse(String),
}

/// Deterministic caption fallback: the first ten whitespace-separated words
/// of the context, single-space joined, with a literal ellipsis marker.
/// Identical regardless of why the primary path was skipped.
pub fn fallback_caption(context: &str) -> String {
    let words: Vec<&str> = context
        .split_whitespace()
        .take(FALLBACK_WORD_LIMIT)
        .collect();
    format!("{}...", words.join(" "))
}

#[derive(Clone)]
pub struct CaptionClient {
    http: reqwest::Client,
    config: OpenAiConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl CaptionClient {
    pub fn new(config: OpenAiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            credentials,
        }
    }

    /// Never fails. Primary path is one chat-completion call; any failure
    /// (including a missing credential) degrades to the truncation
    /// fallback.
    pub async fn caption(&self, context: &str, tone: &str) -> CaptionOutcome {
        let Some(api_key) = self.credentials.credential(API_KEY_NAME) else {
            log::debug!("No {} configured, using fallback caption", API_KEY_NAME);
            return CaptionOutcome::fallback(fallback_caption(context));
        };

        match self.request_caption(context, tone, &api_key).await {
            Ok(text) => CaptionOutcome::primary(text),
            Err(e) => {
                log::debug!("Caption backend failed ({}), using fallback", e);
                CaptionOutcome::fallback(fallback_caption(context))
            }
        }
    }

    async fn request_caption(
        &self,
        context: &str,
        tone: &str,
        api_key: &str,
    ) -> Result<String, CaptionFailure> {
        let url = format!("{}/v1/chat/completions", self.config.api_base);
        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                {
                    "role": "user",
                    "content": format!(
                        "Image details: {} \nTone: {}.\nWrite one caption.",
                        context, tone
                    ),
                },
            ],
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CaptionFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionFailure::BackendRejected {
                status: status.as_u16(),
                body,
            });
        }

        let completion: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CaptionFailure::MalformedResponse(e.to_string()))?;
        first_line_of_completion(&completion)
    }
}

#[async_trait]
impl CaptionSynthesis for CaptionClient {
    async fn caption(&self, context: &str, tone: &str) -> CaptionOutcome {
        CaptionClient::caption(self, context, tone).await
    }
}

/// Completions occasionally run to multiple lines; only the first is a
/// usable caption.
fn first_line_of_completion(completion: &serde_json::Value) -> Result<String, CaptionFailure> {
    completion
        .get("choices")
        .and_then(|choices| choices.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::trim)
        .and_then(|content| content.lines().next())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| CaptionFailure::MalformedResponse("completion has no content".to_string()))
}
