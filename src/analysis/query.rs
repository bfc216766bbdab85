//! Query synthesis from persona and job-to-be-done.

use std::fmt;

/// The text every candidate is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    text: String,
}

impl Query {
    /// Build the query for a persona and job. Both fields are trimmed and
    /// embedded verbatim.
    pub fn new(persona: &str, job: &str) -> Self {
        Self {
            text: format!("Persona: {}. Task: {}.", persona.trim(), job.trim()),
        }
    }

    /// The query text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
