//! Collection analysis: extraction, segmentation, ranking and report assembly.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use super::options::AnalysisOptions;
use super::query::Query;
use super::ranker::RelevanceRanker;
use super::segmenter::SectionSegmenter;
use super::subsection::extract_subsections;
use crate::detect;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::extract::{ExtractOptions, PdfTextExtractor};
use crate::model::{
    AnalysisReport, CollectionRequest, DocumentText, ReportMetadata, Section, SkippedDocument,
};

/// Runs the full pipeline over a document collection.
pub struct CollectionAnalyzer {
    encoder: Box<dyn Encoder>,
    options: AnalysisOptions,
    extractor: PdfTextExtractor,
}

impl CollectionAnalyzer {
    /// Create an analyzer with default options.
    pub fn new(encoder: Box<dyn Encoder>) -> Self {
        Self {
            encoder,
            options: AnalysisOptions::default(),
            extractor: PdfTextExtractor::default(),
        }
    }

    /// Set analysis options.
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extractor = PdfTextExtractor::new(options);
        self
    }

    /// The analysis options in use.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// The encoder in use.
    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    /// Segment one extracted document.
    pub fn segment(&self, doc: &DocumentText) -> Vec<Section> {
        SectionSegmenter::new(self.options.max_section_chars).segment(doc)
    }

    /// Analyze PDF files on disk.
    ///
    /// Unreadable documents are skipped and listed in the report metadata.
    /// Only encoder failures abort the run.
    pub fn analyze_files(&self, paths: &[PathBuf], persona: &str, job: &str) -> Result<AnalysisReport> {
        let started = Instant::now();
        log::info!("Analyzing {} documents", paths.len());

        let ids: Vec<String> = paths.iter().map(|p| detect::document_id(p)).collect();
        let mut skipped = Vec::new();
        let mut documents = Vec::new();

        for (id, result) in ids.iter().zip(self.extractor.extract_files(paths)) {
            match result {
                Ok(doc) => documents.push(doc),
                Err(e) if e.is_input_error() => {
                    log::warn!("Skipping {}: {}", id, e);
                    skipped.push(SkippedDocument::new(id.as_str(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        let report = self.analyze_extracted(ids, documents, skipped, persona, job)?;
        log::info!("Analysis finished in {:.2?}", started.elapsed());
        Ok(report)
    }

    /// Analyze already-extracted documents.
    pub fn analyze_documents(
        &self,
        documents: Vec<DocumentText>,
        persona: &str,
        job: &str,
    ) -> Result<AnalysisReport> {
        let ids = documents.iter().map(|d| d.id.clone()).collect();
        self.analyze_extracted(ids, documents, Vec::new(), persona, job)
    }

    /// Analyze the documents named by a collection request.
    ///
    /// Document file names resolve against `pdf_dir`; missing files are skipped.
    pub fn analyze_request<P: AsRef<Path>>(
        &self,
        request: &CollectionRequest,
        pdf_dir: P,
    ) -> Result<AnalysisReport> {
        self.analyze_files(
            &request.document_paths(pdf_dir),
            &request.persona.role,
            &request.job_to_be_done.task,
        )
    }

    fn analyze_extracted(
        &self,
        ids: Vec<String>,
        documents: Vec<DocumentText>,
        mut skipped: Vec<SkippedDocument>,
        persona: &str,
        job: &str,
    ) -> Result<AnalysisReport> {
        let segmented: Vec<(String, Vec<Section>)> = if self.options.parallel {
            documents
                .par_iter()
                .map(|doc| (doc.id.clone(), self.segment(doc)))
                .collect()
        } else {
            documents
                .iter()
                .map(|doc| (doc.id.clone(), self.segment(doc)))
                .collect()
        };

        let mut pool = Vec::new();
        for (id, sections) in segmented {
            if sections.is_empty() {
                log::warn!("Skipping {}: no text", id);
                skipped.push(SkippedDocument::new(id, "No extractable text"));
            } else {
                log::info!("{}: {} sections", id, sections.len());
                pool.extend(sections);
            }
        }

        let metadata = ReportMetadata::new(ids, persona.trim(), job.trim()).with_skipped(skipped);
        self.rank_pool(metadata, pool)
    }

    fn rank_pool(&self, metadata: ReportMetadata, pool: Vec<Section>) -> Result<AnalysisReport> {
        if pool.is_empty() {
            log::warn!("No sections found; producing an empty report");
            return Ok(AnalysisReport::empty(metadata));
        }

        let query = Query::new(&metadata.persona, &metadata.job_to_be_done);
        log::info!("Query: {}", query);

        let ranker = RelevanceRanker::new(self.encoder.as_ref());
        let ranked = ranker.rank(&query, pool, self.options.section_char_budget)?;

        // Empty sections go last, keeping score order within each group.
        let (mut top, empty): (Vec<Section>, Vec<Section>) =
            ranked.into_iter().partition(|s| !s.is_empty());
        top.extend(empty);
        top.truncate(self.options.top_sections);

        let paragraphs = extract_subsections(&ranker, &query, &top, &self.options)?;
        log::info!(
            "Selected {} sections and {} paragraphs",
            top.len(),
            paragraphs.len()
        );

        Ok(AnalysisReport::from_ranked(metadata, &top, &paragraphs))
    }
}
