//! Sections and the paragraphs derived from them.

use serde::{Deserialize, Serialize};

/// A titled run of one document's text, the unit of coarse ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source document identifier
    pub document: String,
    /// Section title (never empty)
    pub title: String,
    /// First page the section appears on (1-indexed)
    pub page: u32,
    /// Accumulated body text; paragraphs are separated by blank lines
    pub body: String,
    /// Relevance score, attached by the ranker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f32>,
}

impl Section {
    /// Create an unscored section.
    pub fn new(
        document: impl Into<String>,
        title: impl Into<String>,
        page: u32,
        body: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            title: title.into(),
            page,
            body: body.into(),
            relevance: None,
        }
    }

    /// Whether the section has no body text.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Body length in characters.
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }
}

/// A chunk of a top-ranked section, the unit of fine-grained extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Source document identifier
    pub document: String,
    /// Page number inherited from the parent section
    pub page: u32,
    /// Paragraph text
    pub text: String,
    /// Position of the parent section in the ranked section list
    pub section_index: usize,
    /// Relevance score, attached by the ranker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f32>,
}

impl Paragraph {
    /// Create a paragraph belonging to `section`.
    pub fn from_section(section: &Section, section_index: usize, text: impl Into<String>) -> Self {
        Self {
            document: section.document.clone(),
            page: section.page,
            text: text.into(),
            section_index,
            relevance: None,
        }
    }
}
