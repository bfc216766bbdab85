//! Relevance ranking against a query.

use super::query::Query;
use crate::encoder::{Encoder, EncoderError};
use crate::model::{Paragraph, Section};
use crate::text::truncate_chars;

/// Something the ranker can score.
pub trait Candidate {
    /// Representative text, with content cut to `budget` characters.
    fn embedding_text(&self, budget: usize) -> String;

    /// Attach the relevance score.
    fn set_relevance(&mut self, score: f32);
}

impl Candidate for Section {
    fn embedding_text(&self, budget: usize) -> String {
        format!(
            "Title: {}. Content: {}",
            self.title,
            truncate_chars(&self.body, budget)
        )
    }

    fn set_relevance(&mut self, score: f32) {
        self.relevance = Some(score);
    }
}

impl Candidate for Paragraph {
    fn embedding_text(&self, budget: usize) -> String {
        truncate_chars(&self.text, budget).to_string()
    }

    fn set_relevance(&mut self, score: f32) {
        self.relevance = Some(score);
    }
}

/// Scores candidates by similarity to a query and orders them.
#[derive(Clone, Copy)]
pub struct RelevanceRanker<'a> {
    encoder: &'a dyn Encoder,
}

impl<'a> RelevanceRanker<'a> {
    pub fn new(encoder: &'a dyn Encoder) -> Self {
        Self { encoder }
    }

    /// Score and sort candidates, most relevant first.
    ///
    /// The encoder is called once for the query and once for all candidates.
    /// Equal scores keep their input order. An empty input returns without
    /// calling the encoder.
    pub fn rank<C: Candidate>(
        &self,
        query: &Query,
        candidates: Vec<C>,
        budget: usize,
    ) -> Result<Vec<C>, EncoderError> {
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let query_vectors = self.encoder.encode(&[query.to_string()])?;
        let query_vector = match query_vectors.as_slice() {
            [v] => v,
            _ => {
                return Err(EncoderError::BatchSize {
                    expected: 1,
                    actual: query_vectors.len(),
                })
            }
        };

        let texts: Vec<String> = candidates
            .iter()
            .map(|c| c.embedding_text(budget))
            .collect();
        let vectors = self.encoder.encode(&texts)?;
        if vectors.len() != texts.len() {
            return Err(EncoderError::BatchSize {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for (mut candidate, vector) in candidates.into_iter().zip(&vectors) {
            let score = self.encoder.similarity(query_vector, vector)?;
            if !score.is_finite() {
                return Err(EncoderError::NonFinite);
            }
            candidate.set_relevance(score);
            scored.push((score, candidate));
        }

        // sort_by is stable
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        log::debug!(
            "Ranked {} candidates with {}",
            scored.len(),
            self.encoder.name()
        );

        Ok(scored.into_iter().map(|(_, c)| c).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores a text by how many times it mentions "beach".
    struct KeywordEncoder {
        calls: AtomicUsize,
    }

    impl KeywordEncoder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Encoder for KeywordEncoder {
        fn name(&self) -> &str {
            "keyword"
        }

        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    if t.starts_with("Persona:") {
                        vec![1.0, 0.0]
                    } else {
                        vec![t.matches("beach").count() as f32, 1.0]
                    }
                })
                .collect())
        }
    }

    struct ShortEncoder;

    impl Encoder for ShortEncoder {
        fn name(&self) -> &str {
            "short"
        }

        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0]).collect())
        }
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("a.pdf", "Museums", 1, "galleries and art"),
            Section::new("a.pdf", "Beaches", 2, "beach beach beach"),
            Section::new("b.pdf", "Coast", 3, "one beach"),
            Section::new("b.pdf", "History", 4, "old walls"),
        ]
    }

    #[test]
    fn test_rank_orders_by_score() {
        let encoder = KeywordEncoder::new();
        let ranker = RelevanceRanker::new(&encoder);
        let query = Query::new("Traveller", "Find beaches");

        let ranked = ranker.rank(&query, sections(), 800).unwrap();
        let titles: Vec<&str> = ranked.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Beaches", "Coast", "Museums", "History"]);
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);

        let scores: Vec<f32> = ranked.iter().map(|s| s.relevance.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let encoder = KeywordEncoder::new();
        let ranker = RelevanceRanker::new(&encoder);
        let query = Query::new("p", "j");

        let ranked = ranker.rank(&query, sections(), 800).unwrap();
        // Museums and History both score zero; Museums came first.
        assert_eq!(ranked[2].title, "Museums");
        assert_eq!(ranked[3].title, "History");
    }

    #[test]
    fn test_rank_is_idempotent() {
        let encoder = KeywordEncoder::new();
        let ranker = RelevanceRanker::new(&encoder);
        let query = Query::new("p", "j");
        let first = ranker.rank(&query, sections(), 800).unwrap();
        let second = ranker.rank(&query, sections(), 800).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_skips_encoder() {
        let encoder = KeywordEncoder::new();
        let ranker = RelevanceRanker::new(&encoder);
        let ranked = ranker
            .rank(&Query::new("p", "j"), Vec::<Section>::new(), 800)
            .unwrap();
        assert!(ranked.is_empty());
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_batch_size_mismatch_is_error() {
        let ranker = RelevanceRanker::new(&ShortEncoder);
        let err = ranker
            .rank(&Query::new("p", "j"), sections(), 800)
            .unwrap_err();
        assert_eq!(
            err,
            EncoderError::BatchSize {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_embedding_text_budget() {
        let section = Section::new("a.pdf", "Food", 1, "abcdefghij");
        assert_eq!(section.embedding_text(4), "Title: Food. Content: abcd");

        let para = Paragraph::from_section(&section, 0, "ééééé");
        assert_eq!(para.embedding_text(3), "ééé");
    }
}
