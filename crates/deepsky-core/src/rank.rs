//! Semantic ranking of catalog items against a query embedding.

use crate::embedding::EmbeddingVector;
use crate::error::EmbeddingResult;

/// Minimum similarity (exclusive) for an item to appear in results.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Maximum number of ranked results returned.
pub const MAX_RANKED_RESULTS: usize = 15;

/// Sentinel similarity assigned to items without a usable embedding.
const MISSING_EMBEDDING_SIMILARITY: f64 = -1.0;

/// An item together with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    /// The ranked item.
    pub item: T,
    /// Cosine similarity to the query, in `[-1, 1]`.
    pub similarity: f64,
}

/// Scores each item against the query, filters by [`SIMILARITY_THRESHOLD`],
/// sorts descending, and keeps at most [`MAX_RANKED_RESULTS`].
///
/// Items without an embedding score the sentinel `-1` and are always excluded
/// by the threshold.
///
/// # Errors
///
/// A model-tag or dimensionality mismatch between the query and any item
/// embedding aborts the whole ranking.
pub fn rank<T>(
    query: &EmbeddingVector,
    items: impl IntoIterator<Item = (T, Option<EmbeddingVector>)>,
) -> EmbeddingResult<Vec<Ranked<T>>> {
    let mut scored = Vec::new();
    let mut scanned = 0usize;

    for (item, embedding) in items {
        scanned += 1;
        let similarity = match embedding {
            Some(embedding) => query.cosine_similarity(&embedding)?,
            None => MISSING_EMBEDDING_SIMILARITY,
        };

        if similarity > SIMILARITY_THRESHOLD {
            scored.push(Ranked { item, similarity });
        }
    }

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(MAX_RANKED_RESULTS);

    tracing::debug!(
        target: crate::TRACING_TARGET,
        scanned,
        kept = scored.len(),
        "ranked catalog items"
    );

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;

    const MODEL: &str = "text-embedding-3-large";

    fn query() -> EmbeddingVector {
        EmbeddingVector::new(MODEL, vec![1.0, 0.0])
    }

    /// Unit vector at an angle whose cosine against the query is `cos`.
    fn item_with_similarity(cos: f64) -> EmbeddingVector {
        EmbeddingVector::new(MODEL, vec![cos, (1.0 - cos * cos).sqrt()])
    }

    #[test]
    fn filters_sorts_and_caps() {
        let items = vec![
            ("low", Some(item_with_similarity(0.4))),
            ("top", Some(item_with_similarity(0.9))),
            ("edge", Some(item_with_similarity(0.51))),
            ("mid", Some(item_with_similarity(0.6))),
        ];

        let ranked = rank(&query(), items).unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.item).collect();
        assert_eq!(names, vec!["top", "mid", "edge"]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let items = vec![("at-threshold", Some(item_with_similarity(0.5)))];
        let ranked = rank(&query(), items).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn missing_embedding_is_always_excluded() {
        let items: Vec<(&str, Option<EmbeddingVector>)> =
            vec![("present", Some(item_with_similarity(0.9))), ("absent", None)];
        let ranked = rank(&query(), items).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item, "present");
    }

    #[test]
    fn caps_at_fifteen_results() {
        let items: Vec<(usize, Option<EmbeddingVector>)> = (0..30)
            .map(|i| (i, Some(item_with_similarity(0.6 + (i as f64) * 0.01))))
            .collect();
        let ranked = rank(&query(), items).unwrap();
        assert_eq!(ranked.len(), MAX_RANKED_RESULTS);
        // Highest similarity first.
        assert_eq!(ranked[0].item, 29);
    }

    #[test]
    fn mismatched_item_embedding_aborts() {
        let items = vec![
            ("good", Some(item_with_similarity(0.9))),
            ("bad", Some(EmbeddingVector::new(MODEL, vec![1.0, 0.0, 0.0]))),
        ];
        assert!(matches!(
            rank(&query(), items),
            Err(EmbeddingError::DimensionMismatch { .. })
        ));
    }
}
