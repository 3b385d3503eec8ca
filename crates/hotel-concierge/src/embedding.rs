//! Offline Embeddings
//!
//! A deterministic bag-of-words embedder for demos and tests, plus the
//! similarity measure the room store ranks by.

use std::hash::{DefaultHasher, Hash, Hasher};

use agent_core::{EmbeddingProvider, Result};
use async_trait::async_trait;

const DEFAULT_DIMENSIONS: usize = 256;

/// Hashes each lower-cased word into a fixed-size vector, then L2-normalizes.
/// Texts sharing words land close together; no model download required.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .map(str::to_lowercase)
        {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let bucket = usize::try_from(hasher.finish() % self.dimensions as u64).unwrap_or(0);
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn model(&self) -> &str {
        "hashing-bow"
    }
}

/// Cosine similarity; 0.0 when either vector is empty or all zeros
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
