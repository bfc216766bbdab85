//! Analysis options and configuration.

use super::segmenter::DEFAULT_MAX_SECTION_CHARS;

/// Options for ranking sections and extracting sub-sections.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Number of top sections reported and mined for paragraphs
    pub top_sections: usize,

    /// Number of paragraphs reported
    pub max_subsections: usize,

    /// Paragraphs kept per section after ranking
    pub paragraphs_per_section: usize,

    /// Body characters sent to the encoder per section
    pub section_char_budget: usize,

    /// Characters sent to the encoder per paragraph
    pub paragraph_char_budget: usize,

    /// Sections with longer bodies are split
    pub max_section_chars: usize,

    /// Minimum paragraph length (characters)
    pub min_paragraph_chars: usize,

    /// Minimum sentence length for sentence grouping (characters)
    pub min_sentence_chars: usize,

    /// Sentences per group
    pub sentences_per_group: usize,

    /// Minimum character window size
    pub min_window_chars: usize,

    /// Whether to segment documents in parallel
    pub parallel: bool,
}

impl AnalysisOptions {
    /// Create new analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of top sections.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.top_sections = n;
        self
    }

    /// Set the number of reported paragraphs.
    pub fn with_max_subsections(mut self, n: usize) -> Self {
        self.max_subsections = n;
        self
    }

    /// Set the per-section paragraph cap.
    pub fn with_paragraphs_per_section(mut self, n: usize) -> Self {
        self.paragraphs_per_section = n;
        self
    }

    /// Set the encoder character budgets for sections and paragraphs.
    pub fn with_char_budgets(mut self, section: usize, paragraph: usize) -> Self {
        self.section_char_budget = section;
        self.paragraph_char_budget = paragraph;
        self
    }

    /// Set the section split threshold.
    pub fn with_max_section_chars(mut self, n: usize) -> Self {
        self.max_section_chars = n;
        self
    }

    /// Enable or disable parallel segmentation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_sections: 5,
            max_subsections: 5,
            paragraphs_per_section: 2,
            section_char_budget: 800,
            paragraph_char_budget: 500,
            max_section_chars: DEFAULT_MAX_SECTION_CHARS,
            min_paragraph_chars: 150,
            min_sentence_chars: 50,
            sentences_per_group: 4,
            min_window_chars: 200,
            parallel: true,
        }
    }
}
