//! Data model for spans, sections, paragraphs and reports.

mod report;
mod request;
mod section;
mod span;

pub use report::{
    AnalysisReport, ExtractedSection, ReportMetadata, SkippedDocument, SubsectionAnalysis,
};
pub use request::{ChallengeInfo, CollectionRequest, JobToBeDone, Persona, RequestDocument};
pub use section::{Paragraph, Section};
pub use span::{DocumentText, TextSpan};
