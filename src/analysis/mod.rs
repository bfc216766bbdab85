//! Section segmentation and persona-driven relevance ranking.

mod header;
mod options;
mod orchestrator;
mod query;
mod ranker;
mod segmenter;
mod subsection;

pub use header::{
    header_score, is_section_header, matches_header_pattern, FontStatistics, DEFAULT_BODY_SIZE,
    HEADER_THRESHOLD,
};
pub use options::AnalysisOptions;
pub use orchestrator::CollectionAnalyzer;
pub use query::Query;
pub use ranker::{Candidate, RelevanceRanker};
pub use segmenter::{split_long, SectionSegmenter, DEFAULT_MAX_SECTION_CHARS};
pub use subsection::{chunk_body, extract_subsections};
