use super::Classifier;
use crate::model::ClassLabel;
use async_trait::async_trait;

/// Returns the same label list for every input.
#[derive(Debug, Clone)]
pub struct FakeClassifier {
    labels: Vec<ClassLabel>,
}

impl FakeClassifier {
    pub fn new(labels: Vec<ClassLabel>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, _text: &str) -> anyhow::Result<Vec<ClassLabel>> {
        Ok(self.labels.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake-classifier"
    }
}
