//! Pre-chunked corpus loading.
//!
//! Accepted layouts, all in chunk order:
//! - a JSON array of strings
//! - a JSON array of `{ "text": ... }` objects
//! - JSON Lines, each line a string or a `{ "text": ... }` object

use grounded_core::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CorpusRecord {
    Text(String),
    Chunk { text: String },
}

impl CorpusRecord {
    fn into_text(self) -> String {
        match self {
            CorpusRecord::Text(text) | CorpusRecord::Chunk { text } => text,
        }
    }
}

/// Load chunk texts from `path`. Blank chunks are dropped.
pub fn load_corpus(path: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Retrieval(format!("Failed to read corpus {}: {}", path.display(), e))
    })?;

    let chunks = parse_corpus(&content)
        .map_err(|e| AppError::Retrieval(format!("Invalid corpus {}: {}", path.display(), e)))?;

    tracing::info!("Loaded {} chunks from {}", chunks.len(), path.display());
    Ok(chunks)
}

/// Parse corpus text in any accepted layout.
pub fn parse_corpus(content: &str) -> AppResult<Vec<String>> {
    let records: Vec<CorpusRecord> = if content.trim_start().starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    AppError::Serialization(format!("line {}: {}", i + 1, e))
                })
            })
            .collect::<AppResult<_>>()?
    };

    let total = records.len();
    let chunks: Vec<String> = records
        .into_iter()
        .map(CorpusRecord::into_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    if chunks.len() < total {
        tracing::debug!("Dropped {} blank chunks", total - chunks.len());
    }

    Ok(chunks)
}
