//! Collection request files: the documents, persona and task of one run.
//!
//! ```json
//! {
//!   "challenge_info": { "challenge_id": "round_1b_002", "test_case_name": "travel_planner" },
//!   "documents": [ { "filename": "South of France - Cities.pdf", "title": "Cities" } ],
//!   "persona": { "role": "Travel Planner" },
//!   "job_to_be_done": { "task": "Plan a trip of 4 days for a group of 10 college friends." }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identification of the test case a request belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    #[serde(default)]
    pub challenge_id: String,
    #[serde(default)]
    pub test_case_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A document listed in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    pub filename: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

/// A full collection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRequest {
    #[serde(default)]
    pub challenge_info: ChallengeInfo,
    pub documents: Vec<RequestDocument>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

impl CollectionRequest {
    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidRequest(e.to_string()))?;
        if request.persona.role.trim().is_empty() {
            return Err(Error::InvalidRequest("persona.role is empty".to_string()));
        }
        if request.job_to_be_done.task.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "job_to_be_done.task is empty".to_string(),
            ));
        }
        Ok(request)
    }

    /// Read and parse a request file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Document paths relative to `pdf_dir`, in request order.
    pub fn document_paths<P: AsRef<Path>>(&self, pdf_dir: P) -> Vec<PathBuf> {
        let pdf_dir = pdf_dir.as_ref();
        self.documents
            .iter()
            .map(|doc| pdf_dir.join(&doc.filename))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "challenge_info": {"challenge_id": "round_1b_002", "test_case_name": "travel_planner"},
        "documents": [
            {"filename": "South of France - Cities.pdf", "title": "South of France - Cities"},
            {"filename": "South of France - Cuisine.pdf", "title": "South of France - Cuisine"}
        ],
        "persona": {"role": "Travel Planner"},
        "job_to_be_done": {"task": "Plan a trip of 4 days for a group of 10 college friends."}
    }"#;

    #[test]
    fn test_parse_request() {
        let request = CollectionRequest::from_json(REQUEST).unwrap();
        assert_eq!(request.documents.len(), 2);
        assert_eq!(request.persona.role, "Travel Planner");
        assert_eq!(request.challenge_info.test_case_name, "travel_planner");
    }

    #[test]
    fn test_document_paths() {
        let request = CollectionRequest::from_json(REQUEST).unwrap();
        let paths = request.document_paths("/data/PDFs");
        assert_eq!(
            paths[1],
            PathBuf::from("/data/PDFs/South of France - Cuisine.pdf")
        );
    }

    #[test]
    fn test_missing_challenge_info_is_allowed() {
        let json = r#"{"documents": [], "persona": {"role": "Chef"}, "job_to_be_done": {"task": "Cook"}}"#;
        let request = CollectionRequest::from_json(json).unwrap();
        assert!(request.challenge_info.challenge_id.is_empty());
    }

    #[test]
    fn test_empty_persona_rejected() {
        let json = r#"{"documents": [], "persona": {"role": "  "}, "job_to_be_done": {"task": "Cook"}}"#;
        assert!(matches!(
            CollectionRequest::from_json(json),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            CollectionRequest::from_json("{"),
            Err(Error::InvalidRequest(_))
        ));
    }
}
