// src/provider/openai.rs — OpenAI Chat Completions backend (metered)

use async_trait::async_trait;

use super::{Backend, Completion, Prompt, TokenUsage};
use crate::infra::errors::OptiscopeError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAIBackend {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIBackend {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.into())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Backend for OpenAIBackend {
    fn id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, model: &str, prompt: Prompt) -> Result<Completion, OptiscopeError> {
        let messages: Vec<serde_json::Value> = prompt
            .into_messages()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect();
        tracing::debug!("openai chat: model={model}, {} messages", messages.len());

        let body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| OptiscopeError::backend("openai", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(OptiscopeError::backend(
                "openai",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OptiscopeError::backend("openai", format!("Failed to parse response: {}", e)))?;

        // A 200 can still carry an error object instead of a choice.
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                OptiscopeError::backend("openai", format!("Response has no message content: {resp}"))
            })?
            .to_string();

        // Missing counters count as zero.
        let usage = TokenUsage {
            prompt_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            completion_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(Completion {
            content,
            usage: Some(usage),
        })
    }
}
