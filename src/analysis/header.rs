//! Section header classification.
//!
//! A flat additive score over three signals:
//! - +2 when the text matches a structural heading pattern
//! - +1 when the span is bold
//! - +1 when the span is set larger than the page's body text
//!
//! A span scoring 2 or more is a header.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::TextSpan;

/// Minimum score for a span to count as a header.
pub const HEADER_THRESHOLD: u32 = 2;

/// Body font size assumed when a page has no long spans.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;

const MIN_HEADER_CHARS: usize = 5;
const MAX_HEADER_CHARS: usize = 120;

/// Spans shorter than this do not vote on the body font size.
const MIN_BODY_SPAN_CHARS: usize = 10;

/// Sizes within this margin of the body size count as body-sized.
const SIZE_EPSILON: f32 = 0.1;

static NON_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+$|page\s+\d+|figure\s+\d+|table\s+\d+)").expect("valid regex")
});

// Structural patterns are case-sensitive: capitalization is the signal.
static HEADER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "1. Introduction", "2 Methods"
        r"^\d+\.?\s+[A-Z\x{4E00}-\x{9FFF}]",
        // "RESULTS AND DISCUSSION"
        r"^[A-Z\x{4E00}-\x{9FFF}][A-Z\x{4E00}-\x{9FFF}\s]{2,}$",
        // "Chapter 2", "SECTION 4", "part 1"
        r"(?i)^(?:chapter|section|part)\s+\d+",
        // "1.1 Scope", "3.2.1. Data"
        r"^\d+\.\d+\.?\s+",
        r"(?i)^(?:abstract|introduction|conclusions?|references|bibliography)\b",
        r"(?i)^(?:executive summary|overview|background|methodology)\b",
        // "Coastal Adventures", "Packing Tips For Families"
        r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]*){1,4}$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Whether the text matches one of the structural heading patterns.
pub fn matches_header_pattern(text: &str) -> bool {
    HEADER_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Score a span. Returns 0 for text that can never be a header.
pub fn header_score(span: &TextSpan, text: &str, body_font_size: f32) -> u32 {
    let len = text.chars().count();
    if !(MIN_HEADER_CHARS..=MAX_HEADER_CHARS).contains(&len) || NON_HEADER.is_match(text) {
        return 0;
    }

    let mut score = 0;
    if matches_header_pattern(text) {
        score += 2;
    }
    if span.is_bold {
        score += 1;
    }
    if span.font_size > body_font_size + SIZE_EPSILON {
        score += 1;
    }
    score
}

/// Whether a span is a section header.
///
/// `text` is the span's normalized text; `body_font_size` is the typical
/// body size of the span's page.
pub fn is_section_header(span: &TextSpan, text: &str, body_font_size: f32) -> bool {
    header_score(span, text, body_font_size) >= HEADER_THRESHOLD
}

/// Font size histogram for finding the body text size.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Observed sizes in tenths of a point, with frequency
    size_histogram: BTreeMap<i32, usize>,
}

impl FontStatistics {
    /// Collect statistics from spans with enough text to be body copy.
    pub fn from_spans<'a>(spans: impl IntoIterator<Item = &'a TextSpan>) -> Self {
        let mut stats = Self::default();
        for span in spans {
            if span.text.trim().chars().count() > MIN_BODY_SPAN_CHARS {
                stats.add_size(span.font_size);
            }
        }
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            let key = (size * 10.0).round() as i32;
            *self.size_histogram.entry(key).or_insert(0) += 1;
        }
    }

    /// The most frequent size; the smaller size wins a tie.
    pub fn body_size(&self) -> f32 {
        self.size_histogram
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(key, _)| *key as f32 / 10.0)
            .unwrap_or(DEFAULT_BODY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, bold: bool) -> TextSpan {
        TextSpan::new(text, size, bold, 1)
    }

    fn is_header(text: &str, size: f32, bold: bool) -> bool {
        is_section_header(&span(text, size, bold), text, 12.0)
    }

    #[test]
    fn test_reference_cases() {
        assert!(is_header("1. Introduction", 16.0, true));
        assert!(!is_header("This is body text", 12.0, false));
        assert!(is_header("Chapter 2: Methods", 14.0, true));
    }

    #[test]
    fn test_pattern_alone_is_enough() {
        assert!(is_header("2.1 Data Sources", 12.0, false));
        assert!(is_header("EXECUTIVE SUMMARY", 12.0, false));
        assert!(is_header("Coastal Adventures", 12.0, false));
        assert!(is_header("Background of the study", 12.0, false));
    }

    #[test]
    fn test_style_alone() {
        // bold + larger, no pattern
        assert!(is_header("the old port at dusk", 14.0, true));
        // bold only
        assert!(!is_header("the old port at dusk", 12.0, true));
        // larger only
        assert!(!is_header("the old port at dusk", 14.0, false));
    }

    #[test]
    fn test_sentences_are_not_title_case() {
        assert!(!is_header("Nice has a pebble beach.", 12.0, false));
        assert!(!is_header("The city is known for its markets", 12.0, false));
    }

    #[test]
    fn test_prefilters() {
        assert!(!is_header("Nice", 20.0, true));
        assert!(!is_header("12345", 20.0, true));
        assert!(!is_header("Page 4", 20.0, true));
        assert!(!is_header("Figure 3: Map of the coast", 20.0, true));
        assert!(!is_header("TABLE 2 Prices", 20.0, true));
        let long = "A".repeat(121);
        assert!(!is_header(&long, 20.0, true));
    }

    #[test]
    fn test_score_values() {
        let s = span("1. Introduction", 16.0, true);
        assert_eq!(header_score(&s, "1. Introduction", 12.0), 4);
        let s = span("plain words here", 12.05, false);
        assert_eq!(header_score(&s, "plain words here", 12.0), 0);
    }

    #[test]
    fn test_font_statistics_body_size() {
        let mut spans = vec![span("Big Title", 24.0, true)];
        for _ in 0..5 {
            spans.push(span("body text long enough to count", 11.0, false));
        }
        spans.push(span("caption text long enough", 9.0, false));
        assert_eq!(FontStatistics::from_spans(&spans).body_size(), 11.0);
    }

    #[test]
    fn test_font_statistics_default_and_ties() {
        let spans = vec![span("short", 30.0, false)];
        assert_eq!(FontStatistics::from_spans(&spans).body_size(), DEFAULT_BODY_SIZE);

        let mut stats = FontStatistics::default();
        stats.add_size(10.0);
        stats.add_size(12.0);
        assert_eq!(stats.body_size(), 10.0);
    }
}
