//! Pure helpers for multi-query retrieval: parsing, padding, dedup and top-k.

use crate::rag::types::ScoredChunk;
use grounded_core::{AppError, AppResult};
use std::collections::HashSet;

/// Normalizes generated related questions to a target count.
///
/// Receives the parsed questions, the original question and the target
/// count. Swap it with [`MultiQuery::with_policy`](crate::rag::MultiQuery::with_policy).
pub type QueryPolicy = fn(Vec<String>, &str, usize) -> Vec<String>;

/// Split model output into non-empty trimmed lines.
pub fn parse_related_questions(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate to `target`, or pad by repeating the first generated question.
///
/// With nothing generated the original question is repeated instead, so
/// fan-out always issues `target` extra queries even when generation
/// underperforms.
pub fn pad_by_repetition(mut generated: Vec<String>, question: &str, target: usize) -> Vec<String> {
    generated.truncate(target);

    let filler = generated
        .first()
        .cloned()
        .unwrap_or_else(|| question.to_string());

    while generated.len() < target {
        generated.push(filler.clone());
    }

    generated
}

/// Drop byte-identical repeats, keeping first-seen order.
pub fn dedup_chunks<I>(chunks: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter(|chunk| seen.insert(chunk.clone()))
        .collect()
}

/// Pair scorer output with the chunks that were scored.
///
/// A length mismatch means the scorer broke its contract; it is reported
/// instead of silently misaligning scores.
pub fn pair_scores(chunks: Vec<String>, scores: Vec<f32>) -> AppResult<Vec<ScoredChunk>> {
    if chunks.len() != scores.len() {
        return Err(AppError::Scoring(format!(
            "Scorer returned {} scores for {} chunks",
            scores.len(),
            chunks.len()
        )));
    }

    Ok(chunks
        .into_iter()
        .zip(scores)
        .map(|(chunk, score)| ScoredChunk { chunk, score })
        .collect())
}

/// Keep the `k` highest-scoring chunks, best first.
///
/// The sort is stable, so equal scores keep pool order. NaN ranks last.
pub fn select_top_k(mut scored: Vec<ScoredChunk>, k: usize) -> Vec<ScoredChunk> {
    let rank = |score: f32| if score.is_nan() { f32::NEG_INFINITY } else { score };

    scored.sort_by(|a, b| rank(b.score).total_cmp(&rank(a.score)));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scored(items: &[(&str, f32)]) -> Vec<ScoredChunk> {
        items
            .iter()
            .map(|(chunk, score)| ScoredChunk {
                chunk: chunk.to_string(),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn test_parse_related_questions() {
        let output = "  What drove margin growth?\n\n\tHow many employees joined?  \n \nWhat is the dividend?";
        assert_eq!(
            parse_related_questions(output),
            strings(&[
                "What drove margin growth?",
                "How many employees joined?",
                "What is the dividend?"
            ])
        );
        assert!(parse_related_questions("\n  \n").is_empty());
    }

    #[test]
    fn test_pad_truncates_long_lists() {
        let generated = strings(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(
            pad_by_repetition(generated, "q", 5),
            strings(&["a", "b", "c", "d", "e"])
        );
    }

    #[test]
    fn test_pad_repeats_first_question() {
        let generated = strings(&["a", "b"]);
        assert_eq!(
            pad_by_repetition(generated, "q", 5),
            strings(&["a", "b", "a", "a", "a"])
        );
    }

    #[test]
    fn test_pad_falls_back_to_original_question() {
        assert_eq!(
            pad_by_repetition(Vec::new(), "q", 5),
            strings(&["q", "q", "q", "q", "q"])
        );
    }

    #[test]
    fn test_pad_exact_length_untouched() {
        let generated = strings(&["a", "b", "c", "d", "e"]);
        assert_eq!(pad_by_repetition(generated.clone(), "q", 5), generated);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let pool = strings(&["B", "A", "B", "C", "A", "A"]);
        assert_eq!(dedup_chunks(pool), strings(&["B", "A", "C"]));
    }

    #[test]
    fn test_dedup_is_exact_match_only() {
        let pool = strings(&["Revenue", "revenue", "Revenue ", "Revenue"]);
        assert_eq!(
            dedup_chunks(pool),
            strings(&["Revenue", "revenue", "Revenue "])
        );
    }

    #[test]
    fn test_pair_scores_rejects_mismatch() {
        let err = pair_scores(strings(&["A", "B"]), vec![0.5]).unwrap_err();
        assert!(err.to_string().contains("1 scores for 2 chunks"));
    }

    #[test]
    fn test_select_top_k_orders_by_score() {
        let pool = scored(&[("A", 0.1), ("B", 0.9), ("C", 0.5), ("D", 0.7)]);
        let top: Vec<String> = select_top_k(pool, 3).into_iter().map(|s| s.chunk).collect();
        assert_eq!(top, strings(&["B", "D", "C"]));
    }

    #[test]
    fn test_select_top_k_ties_keep_pool_order() {
        let pool = scored(&[("A", 0.5), ("B", 0.8), ("C", 0.5), ("D", 0.5)]);
        let top: Vec<String> = select_top_k(pool, 3).into_iter().map(|s| s.chunk).collect();
        assert_eq!(top, strings(&["B", "A", "C"]));
    }

    #[test]
    fn test_select_top_k_small_pool() {
        let pool = scored(&[("A", 0.9), ("B", 0.1)]);
        assert_eq!(select_top_k(pool, 5).len(), 2);
    }

    #[test]
    fn test_select_top_k_nan_ranks_last() {
        let pool = scored(&[("A", f32::NAN), ("B", -3.0), ("C", 2.0)]);
        let top: Vec<String> = select_top_k(pool, 3).into_iter().map(|s| s.chunk).collect();
        assert_eq!(top, strings(&["C", "B", "A"]));
    }

    #[test]
    fn test_selected_scores_dominate_unselected() {
        let pool = scored(&[
            ("A", 0.3),
            ("B", 0.8),
            ("C", -1.2),
            ("D", 0.8),
            ("E", 0.05),
            ("F", 4.0),
            ("G", 0.31),
        ]);
        let selected = select_top_k(pool.clone(), 5);
        let min_selected = selected
            .iter()
            .map(|s| s.score)
            .fold(f32::INFINITY, f32::min);

        for candidate in pool {
            if !selected.iter().any(|s| s.chunk == candidate.chunk) {
                assert!(candidate.score <= min_selected);
            }
        }
    }
}
