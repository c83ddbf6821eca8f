//! Classifier served over HTTP with the Hugging Face inference payload shape.
//!
//! Request: `{"inputs": "<text>"}`. Response: either `[{"label", "score"}, ...]`
//! or the batched form `[[{"label", "score"}, ...]]`.

use super::Classifier;
use crate::errors::ProviderError;
use crate::model::ClassLabel;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const PROVIDER: &str = "http-classifier";

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierPayload {
    Flat(Vec<ClassLabel>),
    Batched(Vec<Vec<ClassLabel>>),
}

#[derive(Debug, Clone)]
pub struct HttpClassifier {
    pub url: String,
    pub api_key: Option<String>,
    pub client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> anyhow::Result<Vec<ClassLabel>> {
        debug!(url = %self.url, "classifier request");
        let mut req = self.client.post(&self.url).json(&json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req
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

        let payload: ClassifierPayload = resp
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

        Ok(match payload {
            ClassifierPayload::Flat(labels) => labels,
            ClassifierPayload::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
