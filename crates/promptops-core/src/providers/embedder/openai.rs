use super::Embedder;
use crate::errors::ProviderError;
use crate::providers::{normalize_base_url, OPENAI_BASE_URL};
use async_trait::async_trait;
use serde_json::json;

const PROVIDER: &str = "openai";

#[derive(Debug, Clone)]
pub struct OpenAIEmbedder {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl OpenAIEmbedder {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref());
        self
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "input": text,
            "model": self.model,
            "encoding_format": "float"
        });

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

        // data[0].embedding
        let vec = json
            .pointer("/data/0/embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "response missing embedding field"))?;

        let floats = vec
            .iter()
            .map(|x| {
                x.as_f64().map(|f| f as f32).ok_or_else(|| {
                    ProviderError::malformed(PROVIDER, "embedding contains non-numeric value")
                })
            })
            .collect::<Result<Vec<f32>, _>>()?;

        Ok(floats)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model.clone()
    }
}
