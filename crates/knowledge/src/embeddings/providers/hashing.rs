//! Offline feature-hashing embedding provider.
//!
//! Deterministic, network-free vectors for air-gapped runs and demos. Each
//! lowercase word and its character trigrams are hashed into a fixed number
//! of buckets and the result is scaled to unit length. Texts sharing
//! vocabulary land close together; there is no semantic understanding.

use crate::embeddings::provider::EmbeddingProvider;
use sentra_core::AppResult;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const TRIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedding provider.
#[derive(Debug)]
pub struct HashingProvider {
    dimensions: usize,
}

impl HashingProvider {
    /// Create a provider producing `dimensions`-long vectors (at least 1).
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let hash = fnv1a(feature.as_bytes());
        let index = (hash % self.dimensions as u64) as usize;
        // High bit picks the sign so collisions tend to cancel out
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    fn hash_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();

        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let (index, sign) = self.bucket(word);
            embedding[index] += sign;

            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let (index, sign) = self.bucket(&trigram);
                embedding[index] += sign * TRIGRAM_WEIGHT;
            }
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    fn provider_name(&self) -> &str {
        "hashing"
    }

    fn model_name(&self) -> &str {
        "hashing-v1"
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        Ok(self.hash_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[tokio::test]
    async fn test_dimensions_and_unit_norm() {
        let provider = HashingProvider::new(64);
        let embedding = provider.embed("Rust is a systems language").await.unwrap();

        assert_eq!(embedding.len(), 64);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = HashingProvider::new(128);
        let a = provider.embed("the sky is blue").await.unwrap();
        let b = provider.embed("The sky is BLUE!").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = HashingProvider::new(16);
        let embedding = provider.embed("   ").await.unwrap();
        assert_eq!(embedding, vec![0.0; 16]);
    }

    #[tokio::test]
    async fn test_shared_vocabulary_scores_higher() {
        let provider = HashingProvider::new(384);
        let cats = provider.embed("cats are small furry mammals").await.unwrap();
        let sky = provider.embed("the sky is blue during the day").await.unwrap();
        let query = provider.embed("are cats mammals").await.unwrap();

        assert!(cosine_similarity(&query, &cats) > cosine_similarity(&query, &sky));
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        assert_eq!(HashingProvider::new(0).dimensions, 1);
    }
}
