use crate::model::ClassLabel;
use async_trait::async_trait;

pub mod fake;
pub mod http;

/// Classifier-style completion capability: ranked labels, best first.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<Vec<ClassLabel>>;
    fn provider_name(&self) -> &'static str;
}
