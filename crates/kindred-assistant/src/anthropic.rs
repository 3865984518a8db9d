//! Anthropic Messages API provider.

use async_trait::async_trait;
use kindred_types::models::{ChatMessage, ChatRole};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AssistantError, AssistantResult, parse_http_error};
use crate::persona::SYSTEM_PROMPT;
use crate::provider::ChatProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 1024,
        }
    }
}

pub struct AnthropicProvider {
    config: AssistantConfig,
    http_client: reqwest::Client,
    messages_url: String,
}

impl AnthropicProvider {
    pub fn new(config: AssistantConfig) -> Self {
        let messages_url = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
        tracing::info!("Assistant provider initialized: url={}, model={}", messages_url, config.model);

        Self {
            config,
            http_client: reqwest::Client::new(),
            messages_url,
        }
    }

    fn build_request_body(&self, history: &[ChatMessage], new_text: &str) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect();
        messages.push(serde_json::json!({ "role": "user", "content": new_text }));

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": SYSTEM_PROMPT,
            "messages": messages,
        })
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn extract_text(response: MessagesResponse) -> AssistantResult<String> {
    let text: String = response
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        Err(AssistantError::EmptyReply)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn send_message(&self, history: &[ChatMessage], new_text: &str) -> AssistantResult<String> {
        let api_key = self.config.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;
        let body = self.build_request_body(history, new_text);

        debug!("Assistant POST {} ({} prior turns)", self.messages_url, history.len());

        let response = self
            .http_client
            .post(&self.messages_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        if status != 200 {
            warn!("Assistant API error: HTTP {} from {}: {}", status, self.messages_url, body_text);
            return Err(parse_http_error(status, &body_text));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body_text)
            .map_err(|e| AssistantError::Parse(e.to_string()))?;
        extract_text(parsed)
    }
}
