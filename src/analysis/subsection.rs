//! Sub-section extraction from top-ranked sections.
//!
//! Each section body is chunked with a three-tier fallback:
//! 1. blank-line paragraphs longer than the minimum
//! 2. groups of sentences, when paragraphs are too few
//! 3. fixed character windows, as a last resort
//!
//! The first tier giving at least two chunks wins; failing that, the first
//! tier giving any chunk. All chunks of all sections are ranked together.

use std::collections::HashMap;

use super::options::AnalysisOptions;
use super::query::Query;
use super::ranker::RelevanceRanker;
use crate::encoder::EncoderError;
use crate::model::{Paragraph, Section};
use crate::text::{char_windows, split_sentences};

/// Split a section body into candidate paragraph texts.
pub fn chunk_body(body: &str, options: &AnalysisOptions) -> Vec<String> {
    let tiers: [fn(&str, &AnalysisOptions) -> Vec<String>; 3] =
        [paragraph_chunks, sentence_chunks, window_chunks];

    let mut fallback = Vec::new();
    for tier in tiers {
        let chunks = tier(body, options);
        if chunks.len() >= 2 {
            return chunks;
        }
        if fallback.is_empty() {
            fallback = chunks;
        }
    }
    fallback
}

fn longer_than(text: &str, min: usize) -> bool {
    text.chars().count() > min
}

fn paragraph_chunks(body: &str, options: &AnalysisOptions) -> Vec<String> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| longer_than(p, options.min_paragraph_chars))
        .map(str::to_string)
        .collect()
}

fn sentence_chunks(body: &str, options: &AnalysisOptions) -> Vec<String> {
    let sentences: Vec<&str> = split_sentences(body)
        .into_iter()
        .filter(|s| longer_than(s, options.min_sentence_chars))
        .collect();

    sentences
        .chunks(options.sentences_per_group.max(1))
        .map(|group| group.join(" "))
        .filter(|chunk| longer_than(chunk, options.min_paragraph_chars))
        .collect()
}

fn window_chunks(body: &str, options: &AnalysisOptions) -> Vec<String> {
    let window = options.min_window_chars.max(body.chars().count() / 3);
    char_windows(body, window)
        .into_iter()
        .map(str::trim)
        .filter(|w| longer_than(w, options.min_paragraph_chars))
        .map(str::to_string)
        .collect()
}

/// Extract and rank paragraphs from ranked sections.
///
/// `sections` are the top sections in rank order. Candidates from all
/// sections are ranked in one batch; afterwards at most
/// `paragraphs_per_section` survive per section and `max_subsections` overall.
pub fn extract_subsections(
    ranker: &RelevanceRanker<'_>,
    query: &Query,
    sections: &[Section],
    options: &AnalysisOptions,
) -> Result<Vec<Paragraph>, EncoderError> {
    let candidates: Vec<Paragraph> = sections
        .iter()
        .enumerate()
        .flat_map(|(idx, section)| {
            chunk_body(&section.body, options)
                .into_iter()
                .map(move |chunk| Paragraph::from_section(section, idx, chunk))
        })
        .collect();

    log::debug!(
        "{} candidate paragraphs from {} sections",
        candidates.len(),
        sections.len()
    );

    let ranked = ranker.rank(query, candidates, options.paragraph_char_budget)?;

    let mut per_section: HashMap<usize, usize> = HashMap::new();
    Ok(ranked
        .into_iter()
        .filter(|para| {
            let count = per_section.entry(para.section_index).or_insert(0);
            *count += 1;
            *count <= options.paragraphs_per_section
        })
        .take(options.max_subsections)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Encoder, HashingEncoder};

    fn sentence(topic: &str) -> String {
        format!("The {topic} is described here in enough detail to pass the sentence filter.")
    }

    #[test]
    fn test_tier_one_paragraphs() {
        let para = "a".repeat(160);
        let body = format!("{para}\n\nshort\n\n{para}");
        let chunks = chunk_body(&body, &AnalysisOptions::default());
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_tier_two_sentence_groups() {
        let body: Vec<String> = (0..8).map(|i| sentence(&format!("place {i}"))).collect();
        let body = body.join(" ");
        assert!(!body.contains("\n\n"));

        let chunks = chunk_body(&body, &AnalysisOptions::default());
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("The place 0"));
        assert!(chunks[1].starts_with("The place 4"));
    }

    #[test]
    fn test_tier_three_windows() {
        // One long run-on text without sentence ends.
        let body = "word ".repeat(200);
        let chunks = chunk_body(body.trim(), &AnalysisOptions::default());
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() > 150));
    }

    #[test]
    fn test_single_chunk_fallback() {
        let body = "b".repeat(170);
        let chunks = chunk_body(&body, &AnalysisOptions::default());
        assert_eq!(chunks, vec![body]);
    }

    #[test]
    fn test_short_body_yields_nothing() {
        assert!(chunk_body("too short", &AnalysisOptions::default()).is_empty());
        assert!(chunk_body("", &AnalysisOptions::default()).is_empty());
    }

    #[test]
    fn test_caps_per_section_and_total() {
        let long_para = |topic: &str| {
            (0..3).map(|_| sentence(topic)).collect::<Vec<_>>().join(" ")
        };
        let body = (0..4)
            .map(|i| long_para(&format!("beach {i}")))
            .collect::<Vec<_>>()
            .join("\n\n");
        let sections: Vec<Section> = (0..4)
            .map(|i| Section::new("a.pdf", format!("S{i}"), i + 1, body.clone()))
            .collect();

        let encoder = HashingEncoder::new();
        let ranker = RelevanceRanker::new(&encoder as &dyn Encoder);
        let paragraphs = extract_subsections(
            &ranker,
            &Query::new("Traveller", "beaches"),
            &sections,
            &AnalysisOptions::default(),
        )
        .unwrap();

        assert_eq!(paragraphs.len(), 5);
        for idx in 0..4 {
            let n = paragraphs.iter().filter(|p| p.section_index == idx).count();
            assert!(n <= 2);
        }
        for para in &paragraphs {
            assert_eq!(para.page, sections[para.section_index].page);
            assert!(para.relevance.is_some());
        }
    }
}
