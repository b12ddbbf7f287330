//! Type-safe embedding model references.

use serde::{Deserialize, Serialize};

/// Reference to an OpenAI embedding model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingModel {
    /// text-embedding-3-large (3072 dimensions)
    #[default]
    TextEmbedding3Large,
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
}

impl EmbeddingModel {
    /// The wire name of the model, also used as the stored model tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding3Large => "text-embedding-3-large",
            Self::TextEmbedding3Small => "text-embedding-3-small",
        }
    }

    /// Number of dimensions the model produces.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Large => 3072,
            Self::TextEmbedding3Small => 1536,
        }
    }
}

impl std::fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_match_the_openai_api() {
        assert_eq!(
            EmbeddingModel::TextEmbedding3Large.as_str(),
            "text-embedding-3-large"
        );
        assert_eq!(EmbeddingModel::TextEmbedding3Large.dimensions(), 3072);
        assert_eq!(EmbeddingModel::TextEmbedding3Small.dimensions(), 1536);
    }

    #[test]
    fn default_is_the_large_model() {
        assert_eq!(EmbeddingModel::default(), EmbeddingModel::TextEmbedding3Large);
    }
}
