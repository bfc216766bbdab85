//! JSON rendering for analysis reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::AnalysisReport;

/// File name of the report inside an output directory.
pub const REPORT_FILE_NAME: &str = "challenge1b_output.json";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a report to JSON.
pub fn to_json(report: &AnalysisReport, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => to_string_indented(report),
        JsonFormat::Compact => serde_json::to_string(report),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

fn to_string_indented<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a report as `challenge1b_output.json` into `dir`, creating it if needed.
///
/// Returns the path written.
pub fn write_report<P: AsRef<Path>>(
    report: &AnalysisReport,
    dir: P,
    format: JsonFormat,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE_NAME);
    fs::write(&path, to_json(report, format)?)?;
    log::info!("Report written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, ReportMetadata, Section};

    fn report() -> AnalysisReport {
        let section = Section::new("guide.pdf", "Beaches", 2, "Sand and sea.");
        let para = Paragraph::from_section(&section, 0, "Sand and sea.");
        let metadata = ReportMetadata::new(vec!["guide.pdf".into()], "Travel Planner", "Plan");
        AnalysisReport::from_ranked(metadata, &[section], &[para])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\n    \"metadata\": {"));
        assert!(json.contains("\"section_title\": \"Beaches\""));
        assert!(json.contains("\"importance_rank\": 1"));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"refined_text\":\"Sand and sea.\""));
    }

    #[test]
    fn test_field_order() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        let metadata = json.find("\"metadata\"").unwrap();
        let sections = json.find("\"extracted_sections\"").unwrap();
        let subsections = json.find("\"subsection_analysis\"").unwrap();
        assert!(metadata < sections && sections < subsections);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        let path = write_report(&report(), &out, JsonFormat::Pretty).unwrap();

        assert_eq!(path, out.join(REPORT_FILE_NAME));
        let written = fs::read_to_string(path).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.extracted_sections, report().extracted_sections);
        assert_eq!(parsed.subsection_analysis, report().subsection_analysis);
    }
}
