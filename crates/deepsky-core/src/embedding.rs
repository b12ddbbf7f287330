//! Embedding vectors with model tagging.

use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, EmbeddingResult};

/// A fixed-length embedding vector tagged with the model that produced it.
///
/// Two vectors are comparable only when both the model tag and the length
/// match; anything else is an [`EmbeddingError`], never a silent mis-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    model: String,
    values: Vec<f64>,
}

impl EmbeddingVector {
    /// Creates a vector from raw components.
    pub fn new(model: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            model: model.into(),
            values,
        }
    }

    /// Parses a comma-delimited embedding string as stored in the catalog.
    pub fn parse(model: impl Into<String>, text: &str) -> EmbeddingResult<Self> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::Empty);
        }

        let values = text
            .split(',')
            .enumerate()
            .map(|(position, part)| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| EmbeddingError::Parse {
                        position,
                        value: part.trim().to_string(),
                    })
            })
            .collect::<EmbeddingResult<Vec<f64>>>()?;

        Ok(Self {
            model: model.into(),
            values,
        })
    }

    /// Serializes the vector into the comma-delimited catalog format.
    pub fn to_delimited(&self) -> String {
        let parts: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        parts.join(",")
    }

    /// Returns the model tag.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the vector components.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the dimensionality of the vector.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Computes the cosine similarity between two vectors.
    ///
    /// Accumulates in `f64`; a zero-magnitude operand yields `0.0` rather
    /// than a NaN.
    ///
    /// # Errors
    ///
    /// Returns an error when the model tags or the lengths differ.
    pub fn cosine_similarity(&self, other: &Self) -> EmbeddingResult<f64> {
        if self.model != other.model {
            return Err(EmbeddingError::ModelMismatch {
                left: self.model.clone(),
                right: other.model.clone(),
            });
        }

        if self.values.len() != other.values.len() {
            return Err(EmbeddingError::DimensionMismatch {
                left: self.values.len(),
                right: other.values.len(),
            });
        }

        let mut dot = 0.0f64;
        let mut mag_a = 0.0f64;
        let mut mag_b = 0.0f64;

        for (a, b) in self.values.iter().zip(other.values.iter()) {
            dot += a * b;
            mag_a += a * a;
            mag_b += b * b;
        }

        let denom = mag_a.sqrt() * mag_b.sqrt();
        if denom == 0.0 {
            return Ok(0.0);
        }

        Ok(dot / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "text-embedding-3-large";

    #[test]
    fn parse_round_trip() {
        let vector = EmbeddingVector::new(MODEL, vec![0.25, -1.5, 3.0]);
        let text = vector.to_delimited();
        let parsed = EmbeddingVector::parse(MODEL, &text).unwrap();
        assert_eq!(parsed, vector);
    }

    #[test]
    fn parse_rejects_empty_string() {
        assert!(matches!(
            EmbeddingVector::parse(MODEL, "   "),
            Err(EmbeddingError::Empty)
        ));
    }

    #[test]
    fn parse_rejects_malformed_component() {
        let err = EmbeddingVector::parse(MODEL, "0.5,oops,1.0").unwrap_err();
        assert!(matches!(err, EmbeddingError::Parse { position: 1, .. }));
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = EmbeddingVector::new(MODEL, vec![1.0, 2.0, 3.0]);
        let b = EmbeddingVector::new(MODEL, vec![-2.0, 0.5, 1.0]);
        let ab = a.cosine_similarity(&b).unwrap();
        let ba = b.cosine_similarity(&a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn cosine_is_scale_invariant() {
        let a = EmbeddingVector::new(MODEL, vec![1.0, 2.0, 3.0]);
        let b = EmbeddingVector::new(MODEL, vec![0.5, -1.0, 2.0]);
        let scaled = EmbeddingVector::new(MODEL, vec![1.5, -3.0, 6.0]);
        let plain = a.cosine_similarity(&b).unwrap();
        let with_scale = a.cosine_similarity(&scaled).unwrap();
        assert!((plain - with_scale).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let a = EmbeddingVector::new(MODEL, vec![0.3, 0.4, 0.5]);
        let sim = a.cosine_similarity(&a).unwrap();
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_magnitude_yields_zero() {
        let zero = EmbeddingVector::new(MODEL, vec![0.0, 0.0]);
        let other = EmbeddingVector::new(MODEL, vec![1.0, 1.0]);
        assert_eq!(zero.cosine_similarity(&other).unwrap(), 0.0);
    }

    #[test]
    fn model_mismatch_is_an_error() {
        let a = EmbeddingVector::new("model-a", vec![1.0]);
        let b = EmbeddingVector::new("model-b", vec![1.0]);
        assert!(matches!(
            a.cosine_similarity(&b),
            Err(EmbeddingError::ModelMismatch { .. })
        ));
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let a = EmbeddingVector::new(MODEL, vec![1.0, 2.0]);
        let b = EmbeddingVector::new(MODEL, vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            a.cosine_similarity(&b),
            Err(EmbeddingError::DimensionMismatch { left: 2, right: 3 })
        ));
    }
}
