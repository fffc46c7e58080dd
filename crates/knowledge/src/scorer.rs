//! Embedding-based relevance scorer.

use crate::collaborators::RelevanceScorer;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use async_trait::async_trait;
use grounded_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Scores `(question, chunk)` pairs by embedding cosine similarity.
///
/// A bi-encoder stand-in for a cross-encoder; any [`RelevanceScorer`] can
/// replace it. Each distinct question is embedded once per call.
#[derive(Debug, Clone)]
pub struct EmbeddingScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl RelevanceScorer for EmbeddingScorer {
    async fn score(&self, pairs: &[(String, String)]) -> AppResult<Vec<f32>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let mut questions: Vec<String> = Vec::new();
        let mut question_slot: HashMap<&str, usize> = HashMap::new();
        for (question, _) in pairs {
            if !question_slot.contains_key(question.as_str()) {
                question_slot.insert(question.as_str(), questions.len());
                questions.push(question.clone());
            }
        }

        let chunks: Vec<String> = pairs.iter().map(|(_, chunk)| chunk.clone()).collect();

        let question_vectors = self.provider.embed_batch(&questions).await?;
        let chunk_vectors = self.provider.embed_batch(&chunks).await?;

        if question_vectors.len() != questions.len() || chunk_vectors.len() != chunks.len() {
            return Err(AppError::Scoring(
                "Embedding provider returned the wrong number of vectors".to_string(),
            ));
        }

        let scores = pairs
            .iter()
            .zip(&chunk_vectors)
            .map(|((question, _), chunk_vector)| {
                let slot = question_slot[question.as_str()];
                cosine_similarity(&question_vectors[slot], chunk_vector)
            })
            .collect();

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;

    #[tokio::test]
    async fn test_scores_align_with_pairs() {
        let scorer = EmbeddingScorer::new(Arc::new(TrigramProvider::new(384)));
        let question = "What were total revenues?".to_string();
        let pairs = vec![
            (question.clone(), "The board held nine meetings.".to_string()),
            (question.clone(), "Total revenues reached $29 billion.".to_string()),
        ];

        let scores = scorer.score(&pairs).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[1] > scores[0]);
    }

    #[tokio::test]
    async fn test_empty_pairs() {
        let scorer = EmbeddingScorer::new(Arc::new(TrigramProvider::new(16)));
        assert!(scorer.score(&[]).await.unwrap().is_empty());
    }
}
