use super::Embedder;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Mode {
    Fixed(Vec<f32>),
    Hashed { dims: usize },
}

/// Offline embedder.
///
/// `fixed` returns the same vector for every input. `hashed` builds a
/// bag-of-words vector by hashing each lowercased token into one of `dims`
/// buckets, so texts sharing words land close together.
#[derive(Debug, Clone)]
pub struct FakeEmbedder {
    pub model: String,
    calls: Arc<AtomicUsize>,
    mode: Mode,
}

impl FakeEmbedder {
    pub fn fixed(model: &str, vec: Vec<f32>) -> Self {
        Self {
            model: model.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            mode: Mode::Fixed(vec),
        }
    }

    pub fn hashed(model: &str, dims: usize) -> Self {
        Self {
            model: model.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            mode: Mode::Hashed { dims: dims.max(1) },
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn bucket(token: &str, dims: usize) -> usize {
    let digest = Sha256::digest(token.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_le_bytes(head) % dims as u64) as usize
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            Mode::Fixed(vec) => Ok(vec.clone()),
            Mode::Hashed { dims } => {
                let mut vec = vec![0.0f32; *dims];
                for token in text
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|t| !t.is_empty())
                {
                    vec[bucket(&token.to_lowercase(), *dims)] += 1.0;
                }
                Ok(vec)
            }
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }

    fn model_id(&self) -> String {
        self.model.clone()
    }
}
