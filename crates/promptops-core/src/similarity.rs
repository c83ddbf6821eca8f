//! Semantic similarity between a response and the expected result.

use crate::errors::ProviderError;
use crate::providers::embedder::Embedder;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Scalar similarity of two texts. Must be deterministic for a fixed pair.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f64>;
    fn name(&self) -> String;
}

/// Score `response` against `expected`; an absent response has no score.
pub async fn score_response(
    scorer: &dyn SimilarityScorer,
    response: Option<&str>,
    expected: &str,
) -> anyhow::Result<Option<f64>> {
    match response {
        Some(text) if !text.is_empty() => Ok(Some(scorer.similarity(text, expected).await?)),
        _ => Ok(None),
    }
}

/// Cosine similarity in `[-1, 1]`. A zero vector scores `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ProviderError> {
    if a.len() != b.len() {
        return Err(ProviderError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(ProviderError::EmptyEmbedding);
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0))
}

pub fn embed_cache_key(model_id: &str, text: &str) -> String {
    let mut h = Sha256::new();
    h.update(model_id.as_bytes());
    h.update(b"\n");
    h.update(text.as_bytes());
    hex::encode(h.finalize())
}

/// Cosine similarity over embeddings, with an in-memory embedding cache.
///
/// The expected result of a case is embedded once and reused for both the
/// original and the perturbed response.
pub struct EmbeddingSimilarity {
    embedder: Arc<dyn Embedder>,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl EmbeddingSimilarity {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn embed_cached(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let key = embed_cache_key(&self.embedder.model_id(), text);
        let cached = {
            let guard = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            guard.get(&key).cloned()
        };
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let vec = self.embedder.embed(text).await?;
        debug!(embedder = self.embedder.name(), dims = vec.len(), "embedded text");
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, vec.clone());
        Ok(vec)
    }
}

#[async_trait]
impl SimilarityScorer for EmbeddingSimilarity {
    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f64> {
        let va = self.embed_cached(a).await?;
        let vb = self.embed_cached(b).await?;
        Ok(cosine_similarity(&va, &vb)?)
    }

    fn name(&self) -> String {
        format!("cosine:{}:{}", self.embedder.name(), self.embedder.model_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::embedder::fake::FakeEmbedder;

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn cosine_rejects_bad_dims() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(ProviderError::DimensionMismatch { left: 1, right: 2 })
        ));
        assert!(matches!(
            cosine_similarity(&[], &[]),
            Err(ProviderError::EmptyEmbedding)
        ));
    }

    #[tokio::test]
    async fn expected_result_is_embedded_once() {
        let embedder = Arc::new(FakeEmbedder::hashed("fake", 64));
        let scorer = EmbeddingSimilarity::new(embedder.clone());
        let expected = "An animal rested on a surface";

        let s1 = scorer.similarity("The cat sat on the mat", expected).await.unwrap();
        let s2 = scorer.similarity("Teh cat sat on the mat", expected).await.unwrap();
        assert_eq!(embedder.calls(), 3);
        assert!((0.0..=1.0).contains(&s1));
        assert!((0.0..=1.0).contains(&s2));

        let again = scorer.similarity("The cat sat on the mat", expected).await.unwrap();
        assert_eq!(s1, again);
        assert_eq!(embedder.calls(), 3);
    }

    #[tokio::test]
    async fn symmetric() {
        let scorer = EmbeddingSimilarity::new(Arc::new(FakeEmbedder::hashed("fake", 64)));
        let ab = scorer.similarity("red apple pie", "apple tart").await.unwrap();
        let ba = scorer.similarity("apple tart", "red apple pie").await.unwrap();
        assert_eq!(ab, ba);
    }

    #[tokio::test]
    async fn absent_response_has_no_score() {
        let scorer = EmbeddingSimilarity::new(Arc::new(FakeEmbedder::hashed("fake", 8)));
        assert_eq!(score_response(&scorer, None, "x").await.unwrap(), None);
        assert_eq!(score_response(&scorer, Some(""), "x").await.unwrap(), None);
        assert!(score_response(&scorer, Some("x"), "x").await.unwrap().is_some());
    }
}
