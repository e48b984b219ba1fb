//! Offline embeddings and vector similarity
//!
//! [`MockEmbeddingModel`] stands in for a real embedding service in tests
//! and in `providers.mock` mode. Each component is a hash of the text and
//! the component index, and the vector is scaled to unit length. Equal text
//! gives equal vectors; anything else is close to orthogonal. There is no
//! semantic signal.
//!
//! ```rust
//! use claimwise_store::embedding::{cosine_similarity, MockEmbeddingModel};
//! use claimwise_domain::traits::EmbeddingProvider;
//!
//! let model = MockEmbeddingModel::new(384);
//! let a = model.embed("Employer: Acme Corp").unwrap();
//! let b = model.embed("Employer: Acme Corp").unwrap();
//! assert_eq!(a.len(), 384);
//! assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-4);
//! ```

use claimwise_domain::traits::{EmbeddingProvider, ProviderError};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic hash-based embedding provider
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl MockEmbeddingModel {
    /// Model producing vectors of `dimension` entries
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Component `index` of the raw vector, in [-1, 1]
    fn component(text: &str, index: usize) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        (index as u64).hash(&mut hasher);
        let unit = hasher.finish() as f64 / u64::MAX as f64;
        (unit * 2.0 - 1.0) as f32
    }
}

impl EmbeddingProvider for MockEmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(
                "cannot embed empty text".to_string(),
            ));
        }

        let mut vector: Vec<f32> = (0..self.dimension)
            .map(|i| Self::component(text, i))
            .collect();
        let norm = l2_norm(&vector);
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity of two vectors, in [-1, 1]
///
/// Vectors of different length, or with zero magnitude, score 0.0. The
/// all-zero fallback embedding therefore never matches a pattern.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
