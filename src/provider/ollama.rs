// src/provider/ollama.rs — Local model server backend (Ollama generate API)

use async_trait::async_trait;

use super::{Backend, Completion, Prompt};
use crate::infra::errors::OptiscopeError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Unmetered backend: posts a single text prompt with streaming disabled and
/// returns the generated text. No usage counters, no retry.
pub struct OllamaBackend {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    fn id(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, model: &str, prompt: Prompt) -> Result<Completion, OptiscopeError> {
        let prompt = prompt.into_text();
        tracing::debug!("ollama generate: model={model}, prompt={} chars", prompt.len());

        let body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| OptiscopeError::backend("ollama", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(OptiscopeError::backend(
                "ollama",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OptiscopeError::backend("ollama", format!("Failed to parse response: {}", e)))?;

        let content = resp["response"].as_str().ok_or_else(|| {
            OptiscopeError::backend("ollama", "Response is missing the 'response' field")
        })?;

        Ok(Completion {
            content: content.to_string(),
            usage: None,
        })
    }
}
