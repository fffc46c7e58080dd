//! Offline embeddings from hashed words and character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use grounded_core::AppResult;
use std::collections::HashMap;

const MODEL_NAME: &str = "trigram-v1";

/// Words too common in report prose to separate chunks.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "with", "from", "this", "that", "have", "has",
    "had", "its", "their", "they", "them", "which", "what", "how", "our", "who", "into",
];

/// Deterministic content-hashing embedder.
///
/// Each word adds weight to the bucket of its own hash and to the buckets of
/// its padded character trigrams, so related word forms ("revenue",
/// "revenues") land close together. Vectors are L2-normalized.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let mut word_counts: HashMap<String, u32> = HashMap::new();
        for word in tokenize(text) {
            *word_counts.entry(word).or_default() += 1;
        }

        for (word, count) in &word_counts {
            let weight = (*count as f32).sqrt();

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[self.bucket(&trigram)] += weight;
            }

            embedding[self.bucket(word)] += *count as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|v| *v /= norm);
        }

        embedding
    }

    fn bucket(&self, token: &str) -> usize {
        (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize
    }
}

/// Lowercased alphanumeric words of at least three characters, minus stop words.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '$' && c != '%')
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ *b as u64).wrapping_mul(PRIME))
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::cosine_similarity;

    #[tokio::test]
    async fn test_unit_length() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("Revenue grew 4.1% in FY24").await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = TrigramProvider::new(128);
        let texts = vec!["dividend per share".to_string(), "dividend per share".to_string()];
        let embeddings = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(embeddings[0], embeddings[1]);
    }

    #[tokio::test]
    async fn test_stop_words_only_is_zero_vector() {
        let provider = TrigramProvider::new(64);
        let embedding = provider.embed("the and for").await.unwrap();
        assert!(embedding.iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_related_text_scores_higher() {
        let provider = TrigramProvider::new(384);
        let texts = vec![
            "What was the total revenue?".to_string(),
            "Total revenues reached $29 billion.".to_string(),
            "The board held nine meetings.".to_string(),
        ];
        let embeddings = provider.embed_batch(&texts).await.unwrap();

        let related = cosine_similarity(&embeddings[0], &embeddings[1]);
        let unrelated = cosine_similarity(&embeddings[0], &embeddings[2]);
        assert!(related > unrelated);
    }
}
