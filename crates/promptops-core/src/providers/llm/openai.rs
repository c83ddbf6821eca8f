use super::LlmClient;
use crate::errors::ProviderError;
use crate::model::LlmResponse;
use crate::providers::{normalize_base_url, OPENAI_BASE_URL};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

const PROVIDER: &str = "openai";

/// OpenAI chat-completions client. Sampling is pinned (`temperature = 0`,
/// `top_p = 0`) so repeated runs of a suite are as stable as the API allows.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            temperature: 0.0,
            top_p: 0.0,
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at an OpenAI-compatible gateway.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        system_message: &str,
    ) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_message },
                { "role": "user", "content": prompt }
            ],
            "temperature": self.temperature,
            "top_p": self.top_p,
        });

        debug!(url = %url, model, "chat completion request");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "response missing content"))?
            .trim()
            .to_string();

        Ok(LlmResponse {
            text,
            provider: PROVIDER.to_string(),
            model: json
                .get("model")
                .and_then(|m| m.as_str())
                .unwrap_or(model)
                .to_string(),
            meta: json!({ "usage": json.get("usage").cloned().unwrap_or_default() }),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
