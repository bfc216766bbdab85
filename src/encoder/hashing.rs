//! Offline, deterministic encoder based on feature hashing.
//!
//! Each text is reduced to lowercase word unigrams, adjacent-word bigrams and
//! character trigrams. Features are hashed with xxh3 into a fixed number of
//! signed buckets, weighted with sublinear term frequency and L2-normalized,
//! so cosine similarity approximates weighted term overlap.

use std::collections::BTreeMap;

use unicode_normalization::UnicodeNormalization;
use xxhash_rust::xxh3::xxh3_64;

use super::{l2_normalize, Encoder, EncoderError};

/// Default vector dimension (matches all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSION: usize = 384;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.7;
const TRIGRAM_WEIGHT: f32 = 0.35;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "will", "with",
];

/// Feature-hashing encoder.
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    /// Create an encoder with the default dimension.
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_DIMENSION)
    }

    /// Create an encoder with a custom dimension (minimum 16).
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(16),
        }
    }

    /// Vector dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let normalized: String = text.nfkc().flat_map(char::to_lowercase).collect();
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty() && !STOPWORDS.contains(w))
            .collect();

        let mut features: BTreeMap<String, f32> = BTreeMap::new();
        for word in &words {
            *features.entry(format!("w:{word}")).or_default() += UNIGRAM_WEIGHT;

            let padded: Vec<char> = format!("^{word}$").chars().collect();
            for tri in padded.windows(3) {
                let tri: String = tri.iter().collect();
                *features.entry(format!("c:{tri}")).or_default() += TRIGRAM_WEIGHT;
            }
        }
        for pair in words.windows(2) {
            *features.entry(format!("b:{} {}", pair[0], pair[1])).or_default() += BIGRAM_WEIGHT;
        }

        let mut vector = vec![0.0f32; self.dimension];
        for (feature, weight) in features {
            let hash = xxh3_64(feature.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign * (1.0 + weight.ln_1p());
        }
        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for HashingEncoder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::cosine_similarity;

    fn sim(encoder: &HashingEncoder, a: &str, b: &str) -> f32 {
        let vectors = encoder.encode(&[a.to_string(), b.to_string()]).unwrap();
        cosine_similarity(&vectors[0], &vectors[1]).unwrap()
    }

    #[test]
    fn test_dimension_and_norm() {
        let encoder = HashingEncoder::new();
        let vectors = encoder.encode(&["Coastal hiking trails".to_string()]).unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].len(), DEFAULT_DIMENSION);
        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_deterministic() {
        let encoder = HashingEncoder::new();
        let texts = vec!["Nightlife in Marseille".to_string()];
        assert_eq!(encoder.encode(&texts).unwrap(), encoder.encode(&texts).unwrap());
    }

    #[test]
    fn test_related_text_scores_higher() {
        let encoder = HashingEncoder::new();
        let query = "Plan a trip with college friends: nightlife and beaches";
        let related = "The best beaches and nightlife spots for groups of friends";
        let unrelated = "Quarterly revenue grew due to semiconductor demand";
        assert!(sim(&encoder, query, related) > sim(&encoder, query, unrelated));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let encoder = HashingEncoder::with_dimension(32);
        let vectors = encoder.encode(&["".to_string(), "the of".to_string()]).unwrap();
        assert!(vectors[0].iter().all(|x| *x == 0.0));
        assert!(vectors[1].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_minimum_dimension() {
        assert_eq!(HashingEncoder::with_dimension(2).dimension(), 16);
    }
}
