use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Fixed(String),
    Fail(String),
}

/// Offline chat client: echoes the prompt, returns a fixed text, or fails.
#[derive(Debug, Clone)]
pub struct FakeClient {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl FakeClient {
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fixed(response.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        _system_message: &str,
    ) -> anyhow::Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = match &self.behavior {
            Behavior::Echo => prompt.to_string(),
            Behavior::Fixed(text) => text.clone(),
            Behavior::Fail(message) => anyhow::bail!("{}", message),
        };

        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: model.to_string(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
