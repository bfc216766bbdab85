//! Persona and job auto-detection from document file names.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A persona with the job it wants done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaJob {
    pub persona: String,
    pub job: String,
}

struct Category {
    keywords: &'static [&'static str],
    persona: &'static str,
    job: &'static str,
}

// Checked in order; the first category with a matching keyword wins.
const CATEGORIES: &[Category] = &[
    Category {
        keywords: &[
            "paper",
            "research",
            "study",
            "journal",
            "ieee",
            "acm",
            "proceedings",
            "conference",
        ],
        persona: "PhD Researcher",
        job: "Conduct comprehensive literature review and identify key methodologies, findings, and research gaps",
    },
    Category {
        keywords: &[
            "annual",
            "report",
            "financial",
            "earnings",
            "quarterly",
            "revenue",
            "investor",
        ],
        persona: "Investment Analyst",
        job: "Analyze financial performance, revenue trends, market positioning, and investment opportunities",
    },
    Category {
        keywords: &[
            "chapter",
            "textbook",
            "chemistry",
            "physics",
            "math",
            "biology",
            "learn",
            "guide",
        ],
        persona: "Graduate Student",
        job: "Extract key concepts, methodologies, and important information for comprehensive understanding",
    },
    Category {
        keywords: &[
            "travel",
            "guide",
            "city",
            "hotel",
            "restaurant",
            "tourism",
            "trip",
        ],
        persona: "Travel Planner",
        job: "Plan comprehensive itinerary with activities, accommodations, and practical recommendations",
    },
    Category {
        keywords: &[
            "recipe",
            "cooking",
            "cuisine",
            "dinner",
            "lunch",
            "breakfast",
            "food",
        ],
        persona: "Food Contractor",
        job: "Design comprehensive menu with diverse options including dietary restrictions and preparation guidelines",
    },
    Category {
        keywords: &[
            "software",
            "api",
            "programming",
            "development",
            "technical",
            "manual",
            "documentation",
        ],
        persona: "Software Developer",
        job: "Extract technical specifications, implementation guidelines, and best practices",
    },
];

const DEFAULT_PERSONA: &str = "Business Analyst";
const DEFAULT_JOB: &str =
    "Extract key insights, important information, and actionable recommendations";

impl PersonaJob {
    /// Create a persona/job pair.
    pub fn new(persona: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job: job.into(),
        }
    }

    /// Guess a persona from the file names of a collection.
    ///
    /// Keywords are matched as substrings of the lowercased names.
    pub fn detect<P: AsRef<Path>>(paths: &[P]) -> Self {
        let names = paths
            .iter()
            .filter_map(|p| p.as_ref().file_name())
            .map(|n| n.to_string_lossy().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        let detected = CATEGORIES
            .iter()
            .find(|c| c.keywords.iter().any(|k| names.contains(k)))
            .map(|c| Self::new(c.persona, c.job))
            .unwrap_or_default();

        log::debug!("Detected persona: {}", detected.persona);
        detected
    }

    /// Replace fields with explicit values where given.
    pub fn with_overrides(mut self, persona: Option<String>, job: Option<String>) -> Self {
        if let Some(persona) = persona.filter(|p| !p.trim().is_empty()) {
            self.persona = persona;
        }
        if let Some(job) = job.filter(|j| !j.trim().is_empty()) {
            self.job = job;
        }
        self
    }
}

impl Default for PersonaJob {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA, DEFAULT_JOB)
    }
}
