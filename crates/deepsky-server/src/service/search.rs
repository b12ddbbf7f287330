//! Semantic image search over stored embeddings.

use deepsky_core::{EmbeddingVector, Ranked, rank};
use deepsky_postgres::PgClient;
use deepsky_postgres::query::{ImageEmbeddingRow, ImageRepository};
use deepsky_rig::EmbeddingProvider;

use super::TRACING_TARGET;
use super::error::ServiceResult;

/// Ranks catalog images against a free-text prompt.
///
/// The prompt is embedded per query (never cached), scored against the
/// stored per-image vectors by cosine similarity, filtered by the ranking
/// threshold, and capped. Images without a stored embedding are excluded;
/// a stored vector from a different model or of a different length aborts
/// the request rather than mis-scoring it.
#[derive(Debug, Clone)]
pub struct SemanticSearch {
    pg_client: PgClient,
    embeddings: EmbeddingProvider,
}

impl SemanticSearch {
    /// Creates a search service over the given clients.
    pub fn new(pg_client: PgClient, embeddings: EmbeddingProvider) -> Self {
        Self {
            pg_client,
            embeddings,
        }
    }

    /// Embeds the prompt and returns ranked catalog rows.
    pub async fn search(&self, prompt: &str) -> ServiceResult<Vec<Ranked<ImageEmbeddingRow>>> {
        let query = self.embeddings.embed(prompt).await?;
        let rows = self.pg_client.list_images_for_search().await?;
        let scanned = rows.len();

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let embedding = parse_stored_embedding(&row)?;
            items.push((row, embedding));
        }

        let ranked = rank(&query, items)?;

        tracing::debug!(
            target: TRACING_TARGET,
            scanned,
            matched = ranked.len(),
            "semantic search ranked"
        );

        Ok(ranked)
    }
}

/// Parses the stored embedding of one catalog row.
///
/// Rows without a vector, with a blank vector, or without a model tag are
/// treated as having no embedding. A present but malformed vector is a
/// hard error.
fn parse_stored_embedding(row: &ImageEmbeddingRow) -> ServiceResult<Option<EmbeddingVector>> {
    match (row.ai_description.as_deref(), row.embedding_model.as_deref()) {
        (Some(text), Some(model)) if !text.trim().is_empty() => {
            Ok(Some(EmbeddingVector::parse(model, text)?))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        image_id: i32,
        ai_description: Option<&str>,
        embedding_model: Option<&str>,
    ) -> ImageEmbeddingRow {
        ImageEmbeddingRow {
            image_id,
            title: format!("image-{image_id}"),
            preview_image_url: format!("images/{image_id}/resized.jpg"),
            ai_description: ai_description.map(str::to_string),
            embedding_model: embedding_model.map(str::to_string),
        }
    }

    #[test]
    fn untagged_rows_have_no_embedding() {
        let parsed = parse_stored_embedding(&row(1, Some("0.1,0.2"), None)).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn blank_vectors_have_no_embedding() {
        let parsed =
            parse_stored_embedding(&row(1, Some("  "), Some("text-embedding-3-large"))).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn stored_vectors_parse_with_their_model_tag() {
        let parsed =
            parse_stored_embedding(&row(1, Some("0.5,-1.25"), Some("text-embedding-3-small")))
                .unwrap()
                .unwrap();
        assert_eq!(parsed.model(), "text-embedding-3-small");
        assert_eq!(parsed.values(), &[0.5, -1.25]);
    }

    #[test]
    fn malformed_vectors_are_hard_errors() {
        let result =
            parse_stored_embedding(&row(1, Some("0.5,huh"), Some("text-embedding-3-large")));
        assert!(matches!(result, Err(crate::service::ServiceError::Embedding(_))));
    }
}
