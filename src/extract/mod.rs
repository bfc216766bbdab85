//! Page-text extraction: PDF files to ordered [`TextSpan`]s.
//!
//! The extractor validates the PDF header, loads the document through a
//! [`PdfBackend`], interprets each selected page's text operators and returns
//! one span per text line in reading order.

mod backend;
mod layout;
mod options;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
    TextDecoder,
};
pub use layout::{is_bold_font, GlyphRun, TextLine};
pub use options::{ErrorMode, ExtractOptions, PageSelection, MAX_LISTED_PAGES};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{DocumentText, TextSpan};

/// Extracts typed text spans from PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    options: ExtractOptions,
}

impl PdfTextExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the text of a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentText> {
        let path = path.as_ref();
        let version = detect::check_pdf_file(path)?;
        log::debug!("Loading {} (PDF {})", path.display(), version);

        let backend = LopdfBackend::load_file(path)?;
        self.extract_from(detect::document_id(path), &backend)
    }

    /// Extract the text of an in-memory PDF.
    pub fn extract_bytes(&self, id: impl Into<String>, data: &[u8]) -> Result<DocumentText> {
        detect::pdf_version(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        self.extract_from(id, &backend)
    }

    /// Extract several files, in parallel when enabled.
    ///
    /// Results are returned in input order, one per path.
    pub fn extract_files(&self, paths: &[PathBuf]) -> Vec<Result<DocumentText>> {
        if self.options.parallel {
            paths.par_iter().map(|p| self.extract_file(p)).collect()
        } else {
            paths.iter().map(|p| self.extract_file(p)).collect()
        }
    }

    /// Extract text through any backend.
    pub fn extract_from<B: PdfBackend>(
        &self,
        id: impl Into<String>,
        backend: &B,
    ) -> Result<DocumentText> {
        let id = id.into();
        let pages = backend.pages();
        let page_count = pages.len() as u32;

        if self.options.error_mode == ErrorMode::Strict {
            if let Some(last) = self.options.pages.last_page() {
                if last > page_count {
                    return Err(Error::PageOutOfRange(last, page_count));
                }
            }
        }

        let mut spans = Vec::new();
        for (&page_num, &page_id) in &pages {
            if !self.options.pages.includes(page_num) {
                continue;
            }

            match extract_page(backend, page_num, page_id) {
                Ok(page_spans) => spans.extend(page_spans),
                Err(e) if self.options.error_mode == ErrorMode::Strict => return Err(e),
                Err(e) => log::warn!("{}: skipping page {}: {}", id, page_num, e),
            }
        }

        let document = DocumentText::new(id, page_count, spans);
        if !document.has_text() {
            return Err(Error::NoExtractableText(document.id));
        }

        log::debug!(
            "{}: {} spans from {} pages",
            document.id,
            document.spans.len(),
            page_count
        );
        Ok(document)
    }
}

fn extract_page<B: PdfBackend>(backend: &B, page_num: u32, page_id: PageId) -> Result<Vec<TextSpan>> {
    let fonts: HashMap<Vec<u8>, String> = backend
        .page_fonts(page_id)?
        .into_iter()
        .map(|font| (font.name, font.base_font))
        .collect();

    let content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&content)?;
    let decode = backend.text_decoder(page_id)?;

    let runs = layout::interpret_content(&ops, &fonts, &*decode);
    Ok(layout::page_spans(runs, page_num))
}
