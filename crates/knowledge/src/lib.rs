//! Grounded question answering over a chunked report corpus.
//!
//! The [`rag`] module holds the three answer strategies. They talk to the
//! outside world only through the [`collaborators`] traits; this crate also
//! ships working implementations of them:
//! - [`MemoryIndex`]: cosine search over an embedded corpus
//! - [`LlmGenerator`]: generation through any `grounded-llm` client
//! - [`EmbeddingScorer`]: embedding-similarity re-ranking

pub mod collaborators;
pub mod corpus;
pub mod embeddings;
pub mod generation;
pub mod memory_index;
pub mod rag;
pub mod scorer;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use collaborators::{GenerationClient, RelevanceScorer, RetrievalClient};
pub use corpus::{load_corpus, parse_corpus};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use generation::LlmGenerator;
pub use memory_index::MemoryIndex;
pub use rag::{
    direct_retrieval, multi_query, query_expansion, run_strategy, MultiQuery, PipelineContext,
    PipelineResult, PipelineSettings, Strategy,
};
pub use scorer::EmbeddingScorer;
