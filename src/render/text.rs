//! Plain text summary of an analysis report.

use std::fmt::Write;

use crate::model::AnalysisReport;
use crate::text::truncate_chars;

const PREVIEW_CHARS: usize = 200;

/// Render a short human-readable summary of a report.
pub fn to_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;

    let _ = writeln!(out, "Persona: {}", meta.persona);
    let _ = writeln!(out, "Job: {}", meta.job_to_be_done);
    let _ = writeln!(out, "Documents: {}", meta.input_documents.len());
    for skipped in &meta.skipped_documents {
        let _ = writeln!(out, "  skipped {}: {}", skipped.document, skipped.reason);
    }

    out.push_str("\nTop sections:\n");
    if report.extracted_sections.is_empty() {
        out.push_str("  (none)\n");
    }
    for section in &report.extracted_sections {
        let _ = writeln!(
            out,
            "  {}. {} ({}, page {})",
            section.importance_rank, section.section_title, section.document, section.page_number
        );
    }

    if !report.subsection_analysis.is_empty() {
        out.push_str("\nKey passages:\n");
        for para in &report.subsection_analysis {
            let text = para.refined_text.replace('\n', " ");
            let preview = truncate_chars(&text, PREVIEW_CHARS);
            let ellipsis = if preview.len() < text.len() { "..." } else { "" };
            let _ = writeln!(
                out,
                "  - [{} p.{}] {}{}",
                para.document, para.page_number, preview, ellipsis
            );
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, ReportMetadata, Section, SkippedDocument};

    #[test]
    fn test_to_text() {
        let section = Section::new("guide.pdf", "Beaches", 2, "Sand and sea.");
        let para = Paragraph::from_section(&section, 0, "x".repeat(300));
        let metadata = ReportMetadata::new(vec!["guide.pdf".into(), "bad.pdf".into()], "Planner", "Plan")
            .with_skipped(vec![SkippedDocument::new("bad.pdf", "Document is encrypted")]);
        let report = AnalysisReport::from_ranked(metadata, &[section], &[para]);

        let text = to_text(&report);
        assert!(text.contains("Persona: Planner"));
        assert!(text.contains("skipped bad.pdf: Document is encrypted"));
        assert!(text.contains("1. Beaches (guide.pdf, page 2)"));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
    }

    #[test]
    fn test_to_text_empty() {
        let report = AnalysisReport::empty(ReportMetadata::default());
        assert!(to_text(&report).contains("(none)"));
    }
}
