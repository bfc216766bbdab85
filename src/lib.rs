//! # docfocus
//!
//! Persona-driven section ranking for small PDF collections.
//!
//! Given a handful of PDFs, a persona and a job to be done, docfocus splits
//! every document into titled sections, ranks them by semantic similarity to
//! the persona's need, and extracts the most relevant paragraphs from the top
//! sections into a JSON report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docfocus::{analyze_collection, render};
//!
//! fn main() -> docfocus::Result<()> {
//!     let report = analyze_collection(
//!         &["guides/nice.pdf", "guides/marseille.pdf"],
//!         "Travel Planner",
//!         "Plan a trip of 4 days for a group of 10 college friends",
//!     )?;
//!
//!     println!("{}", render::to_json(&report, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: content streams are interpreted into lines with font
//!   size, boldness and text block ([`extract`])
//! - **Segmentation**: typographic and lexical header detection ([`analysis`])
//! - **Ranking**: one query embedding against all sections ([`encoder`])
//! - **Sub-sections**: paragraph chunking with sentence and window fallbacks
//!
//! The default [`HashingEncoder`] works offline. Enable the `minilm` feature
//! for a sentence-transformer encoder.

pub mod analysis;
pub mod detect;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod model;
pub mod persona;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use analysis::{AnalysisOptions, CollectionAnalyzer, Query, SectionSegmenter};
pub use encoder::{Encoder, EncoderError, HashingEncoder};
pub use error::{Error, Result};
pub use extract::{ErrorMode, ExtractOptions, PageSelection, PdfTextExtractor};
pub use model::{
    AnalysisReport, CollectionRequest, DocumentText, Paragraph, ReportMetadata, Section,
    SkippedDocument, TextSpan,
};
pub use persona::PersonaJob;
pub use render::JsonFormat;

use std::path::{Path, PathBuf};

/// Extract the text spans of a PDF file.
///
/// # Example
///
/// ```no_run
/// let text = docfocus::extract_file("guide.pdf").unwrap();
/// println!("{} spans on {} pages", text.spans.len(), text.page_count);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentText> {
    PdfTextExtractor::default().extract_file(path)
}

/// Split a PDF file into titled sections.
///
/// # Example
///
/// ```no_run
/// for section in docfocus::segment_file("guide.pdf").unwrap() {
///     println!("p.{} {}", section.page, section.title);
/// }
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let doc = extract_file(path)?;
    Ok(SectionSegmenter::default().segment(&doc))
}

/// Analyze a collection of PDF files with the default encoder and options.
pub fn analyze_collection<P: AsRef<Path>>(
    paths: &[P],
    persona: &str,
    job: &str,
) -> Result<AnalysisReport> {
    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    CollectionAnalyzer::new(Box::new(HashingEncoder::new())).analyze_files(&paths, persona, job)
}

/// Analyze every PDF directly inside `dir`, in file name order.
///
/// When `persona_job` is `None` the persona is guessed from the file names.
pub fn analyze_dir<P: AsRef<Path>>(
    dir: P,
    persona_job: Option<PersonaJob>,
) -> Result<AnalysisReport> {
    let paths = detect::collect_pdfs(dir)?;
    let persona_job = persona_job.unwrap_or_else(|| PersonaJob::detect(&paths));
    analyze_collection(&paths, &persona_job.persona, &persona_job.job)
}
