//! Section segmentation.
//!
//! Folds a document's spans into titled sections: every header span closes the
//! running section and opens a new one. Text before the first header belongs
//! to a section titled with the document name.

use std::collections::BTreeMap;

use super::header::{is_section_header, FontStatistics};
use crate::model::{DocumentText, Section, TextSpan};
use crate::text::{normalize_span_text, tidy_body};

/// Default maximum body length before a section is split.
pub const DEFAULT_MAX_SECTION_CHARS: usize = 2000;

/// Splits documents into sections.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    max_section_chars: usize,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SECTION_CHARS)
    }
}

/// A section being accumulated.
#[derive(Debug)]
struct Draft<'a> {
    title: String,
    page: u32,
    body: String,
    last_span: Option<&'a TextSpan>,
}

impl<'a> Draft<'a> {
    fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            page,
            body: String::new(),
            last_span: None,
        }
    }

    fn append(&mut self, span: &'a TextSpan, text: &str) {
        if !self.body.is_empty() {
            let separator = match self.last_span {
                Some(last) if last.same_block(span) => " ",
                _ => "\n\n",
            };
            self.body.push_str(separator);
        }
        self.body.push_str(text);
        self.last_span = Some(span);
    }
}

/// Fold state: finished sections plus the open draft.
#[derive(Debug, Default)]
struct Fold<'a> {
    sections: Vec<Draft<'a>>,
    open: Option<Draft<'a>>,
}

impl<'a> Fold<'a> {
    fn close(mut self) -> Vec<Draft<'a>> {
        if let Some(draft) = self.open.take() {
            self.sections.push(draft);
        }
        self.sections
    }
}

impl SectionSegmenter {
    /// Create a segmenter that splits sections longer than `max_section_chars`.
    pub fn new(max_section_chars: usize) -> Self {
        Self {
            max_section_chars: max_section_chars.max(1),
        }
    }

    /// Segment one document into sections, in reading order.
    ///
    /// A document with any text yields at least one section.
    pub fn segment(&self, doc: &DocumentText) -> Vec<Section> {
        let body_sizes = body_sizes_by_page(&doc.spans);
        let last_page = doc.page_count.max(1);
        let stem = doc.stem();

        let drafts = doc
            .spans
            .iter()
            .fold(Fold::default(), |mut state, span| {
                let text = normalize_span_text(&span.text);
                if text.is_empty() {
                    return state;
                }
                let page = span.page.clamp(1, last_page);
                let body_size = body_sizes
                    .get(&span.page)
                    .copied()
                    .unwrap_or(super::header::DEFAULT_BODY_SIZE);

                if is_section_header(span, &text, body_size) {
                    if let Some(done) = state.open.replace(Draft::new(text, page)) {
                        state.sections.push(done);
                    }
                } else {
                    state
                        .open
                        .get_or_insert_with(|| Draft::new(stem, page))
                        .append(span, &text);
                }
                state
            })
            .close();

        drafts
            .into_iter()
            .map(|draft| finish(doc, stem, draft))
            .flat_map(|section| split_long(section, self.max_section_chars))
            .collect()
    }
}

fn body_sizes_by_page(spans: &[TextSpan]) -> BTreeMap<u32, f32> {
    let mut by_page: BTreeMap<u32, Vec<&TextSpan>> = BTreeMap::new();
    for span in spans {
        by_page.entry(span.page).or_default().push(span);
    }
    by_page
        .into_iter()
        .map(|(page, spans)| (page, FontStatistics::from_spans(spans).body_size()))
        .collect()
}

fn finish(doc: &DocumentText, stem: &str, draft: Draft<'_>) -> Section {
    let title = if draft.title.trim().is_empty() {
        format!("{} (page {})", stem, draft.page)
    } else {
        draft.title
    };
    Section::new(doc.id.clone(), title, draft.page, tidy_body(&draft.body))
}

/// Split a section whose body exceeds `max_chars` into same-titled parts.
///
/// Splits at the first paragraph break past the midpoint, falling back to a
/// sentence end and then any whitespace. A body with no such point stays whole.
pub fn split_long(section: Section, max_chars: usize) -> Vec<Section> {
    if section.char_len() <= max_chars {
        return vec![section];
    }

    let Some(at) = split_point(&section.body) else {
        return vec![section];
    };
    let (head, tail) = section.body.split_at(at);
    let (head, tail) = (head.trim(), tail.trim());
    if head.is_empty() || tail.is_empty() {
        return vec![section];
    }

    let first = Section::new(&section.document, &section.title, section.page, head);
    let second = Section::new(&section.document, &section.title, section.page, tail);

    let mut parts = split_long(first, max_chars);
    parts.extend(split_long(second, max_chars));
    parts
}

fn split_point(body: &str) -> Option<usize> {
    let half = body.chars().count() / 2;
    let mid = body.char_indices().nth(half).map(|(i, _)| i)?;
    let rest = &body[mid..];

    if let Some(pos) = rest.find("\n\n") {
        return Some(mid + pos);
    }

    let sentence_end = rest.char_indices().zip(rest.chars().skip(1)).find_map(
        |((i, c), next)| {
            (matches!(c, '.' | '!' | '?') && next.is_whitespace()).then(|| i + c.len_utf8())
        },
    );
    if sentence_end.is_some() {
        return sentence_end.map(|pos| mid + pos);
    }

    rest.find(char::is_whitespace).map(|pos| mid + pos)
}
