use crate::model::LlmResponse;
use crate::providers::classifier::Classifier;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub mod fake;
pub mod openai;

/// Hosted chat-completion capability.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        system_message: &str,
    ) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;
}

/// The two provider shapes a test case can be run against, normalised to
/// "optional text response".
#[derive(Clone)]
pub enum CompletionProvider {
    /// Chat model returning a single text.
    Chat(Arc<dyn LlmClient>),
    /// Classifier returning ranked labels; the first label is the response.
    Classifier(Arc<dyn Classifier>),
}

impl CompletionProvider {
    /// Returns `Ok(None)` without calling the provider when `text` is absent or empty.
    pub async fn complete(
        &self,
        text: Option<&str>,
        model: &str,
        system_message: &str,
    ) -> anyhow::Result<Option<String>> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        debug!(provider = self.provider_name(), model, chars = text.len(), "invoking provider");
        match self {
            CompletionProvider::Chat(client) => {
                let resp = client.complete(text, model, system_message).await?;
                Ok(Some(resp.text))
            }
            CompletionProvider::Classifier(classifier) => {
                let labels = classifier.classify(text).await?;
                Ok(labels.into_iter().next().map(|l| l.label))
            }
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            CompletionProvider::Chat(client) => client.provider_name(),
            CompletionProvider::Classifier(classifier) => classifier.provider_name(),
        }
    }
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionProvider::Chat(c) => write!(f, "Chat({})", c.provider_name()),
            CompletionProvider::Classifier(c) => write!(f, "Classifier({})", c.provider_name()),
        }
    }
}
