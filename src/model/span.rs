//! Page text as delivered by the extractor.

use serde::{Deserialize, Serialize};

/// One line of text with the typography the header classifier looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Dominant font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical position (PDF baseline; larger is higher on the page)
    pub y: f32,
    /// Text block index within the page; a change means a new paragraph
    pub block: u32,
}

impl TextSpan {
    /// Create a span in block 0 at the top of the page.
    pub fn new(text: impl Into<String>, font_size: f32, is_bold: bool, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold,
            page,
            y: 0.0,
            block: 0,
        }
    }

    /// Set the text block index.
    pub fn in_block(mut self, block: u32) -> Self {
        self.block = block;
        self
    }

    /// Check whether two spans belong to the same text block.
    pub fn same_block(&self, other: &TextSpan) -> bool {
        self.page == other.page && self.block == other.block
    }
}

/// The extracted text of one input document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentText {
    /// Document identifier (file name)
    pub id: String,
    /// Total number of pages in the source document
    pub page_count: u32,
    /// Spans in reading order: page, then top to bottom
    pub spans: Vec<TextSpan>,
}

impl DocumentText {
    /// Create document text from spans.
    pub fn new(id: impl Into<String>, page_count: u32, spans: Vec<TextSpan>) -> Self {
        Self {
            id: id.into(),
            page_count,
            spans,
        }
    }

    /// Whether at least one span carries non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.spans.iter().any(|s| !s.text.trim().is_empty())
    }

    /// File name without its extension, used for synthesized titles.
    pub fn stem(&self) -> &str {
        match self.id.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.id,
        }
    }
}
