//! The analysis report handed to the JSON writer.

use serde::{Deserialize, Serialize};

use super::{Paragraph, Section};

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Inputs and run information
    pub metadata: ReportMetadata,

    /// Top sections, rank 1 first
    pub extracted_sections: Vec<ExtractedSection>,

    /// Top paragraphs from the top sections, most relevant first
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl AnalysisReport {
    /// Create a report with no sections or paragraphs.
    pub fn empty(metadata: ReportMetadata) -> Self {
        Self {
            metadata,
            extracted_sections: Vec::new(),
            subsection_analysis: Vec::new(),
        }
    }

    /// Build a report from ranked sections and ranked paragraphs.
    ///
    /// Importance ranks are assigned from list position: 1, 2, ..., N.
    pub fn from_ranked(
        metadata: ReportMetadata,
        sections: &[Section],
        paragraphs: &[Paragraph],
    ) -> Self {
        let extracted_sections = sections
            .iter()
            .enumerate()
            .map(|(i, section)| ExtractedSection {
                document: section.document.clone(),
                section_title: section.title.clone(),
                importance_rank: i as u32 + 1,
                page_number: section.page,
            })
            .collect();

        let subsection_analysis = paragraphs
            .iter()
            .map(|para| SubsectionAnalysis {
                document: para.document.clone(),
                refined_text: para.text.clone(),
                page_number: para.page,
            })
            .collect();

        Self {
            metadata,
            extracted_sections,
            subsection_analysis,
        }
    }

    /// Whether the report has no sections.
    pub fn is_empty(&self) -> bool {
        self.extracted_sections.is_empty()
    }
}

/// Run metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Identifiers of every input document, including skipped ones
    pub input_documents: Vec<String>,

    /// Persona the ranking was biased towards
    pub persona: String,

    /// Job to be done
    pub job_to_be_done: String,

    /// Local time the report was produced (ISO-8601)
    pub processing_timestamp: String,

    /// Documents that could not be used, with the reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_documents: Vec<SkippedDocument>,
}

impl ReportMetadata {
    /// Create metadata stamped with the current local time.
    pub fn new(
        input_documents: Vec<String>,
        persona: impl Into<String>,
        job_to_be_done: impl Into<String>,
    ) -> Self {
        Self {
            input_documents,
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
            processing_timestamp: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            skipped_documents: Vec::new(),
        }
    }

    /// Record skipped documents.
    pub fn with_skipped(mut self, skipped: Vec<SkippedDocument>) -> Self {
        self.skipped_documents = skipped;
        self
    }
}

/// A document left out of the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Document identifier
    pub document: String,
    /// Human-readable reason
    pub reason: String,
}

impl SkippedDocument {
    /// Create a skip record.
    pub fn new(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            reason: reason.into(),
        }
    }
}

/// One entry of `extracted_sections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

/// One entry of `subsection_analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}
