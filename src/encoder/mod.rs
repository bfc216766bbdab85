//! Semantic encoder boundary.
//!
//! The ranking pipeline only sees the [`Encoder`] trait: batch-encode strings
//! into fixed-length vectors and compare two vectors. Model loading and
//! caching stay inside the implementations.

mod hashing;
#[cfg(feature = "minilm")]
mod minilm;

pub use hashing::HashingEncoder;
#[cfg(feature = "minilm")]
pub use minilm::MiniLmEncoder;

use thiserror::Error;

/// Failures raised by an encoder or by similarity scoring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncoderError {
    /// The encoder returned a different number of vectors than inputs.
    #[error("encoder returned {actual} vectors for {expected} inputs")]
    BatchSize { expected: usize, actual: usize },

    /// Two vectors being compared have different lengths.
    #[error("vector dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A vector or similarity contained NaN or infinity.
    #[error("non-finite value in encoder output")]
    NonFinite,

    /// The encoder produced an empty vector.
    #[error("encoder produced an empty vector")]
    EmptyVector,

    /// Backend-specific failure (model loading, tokenization, inference).
    #[error("{0}")]
    Backend(String),
}

/// A text-to-vector embedding capability.
pub trait Encoder: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Encode each input string into one vector, preserving order.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError>;

    /// Similarity of two vectors in [-1, 1].
    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32, EncoderError> {
        cosine_similarity(a, b)
    }
}

/// Cosine similarity between two vectors.
///
/// A zero vector has similarity 0.0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EncoderError> {
    if a.len() != b.len() {
        return Err(EncoderError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(EncoderError::EmptyVector);
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if !dot.is_finite() || !norm_a.is_finite() || !norm_b.is_finite() {
        return Err(EncoderError::NonFinite);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Scale a vector to unit length in place. Zero vectors are left unchanged.
pub(crate) fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-12 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_and_opposite() {
        let a = [1.0, 2.0, 3.0];
        let b = [-1.0, -2.0, -3.0];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&a, &b).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_errors() {
        assert_eq!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(EncoderError::DimensionMismatch { left: 1, right: 2 })
        );
        assert_eq!(cosine_similarity(&[], &[]), Err(EncoderError::EmptyVector));
        assert_eq!(
            cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]),
            Err(EncoderError::NonFinite)
        );
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = [3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = [0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, [0.0, 0.0]);
    }
}
