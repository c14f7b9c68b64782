use crate::models::question::{BloomsLevel, Difficulty, Question, QuestionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One requested bucket of the paper: `count` questions of a type/difficulty pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub topic: String,
    pub subject: Option<String>,
    pub educational_level: Option<String>,
    pub description: Option<String>,
    pub syllabus: Option<String>,
    pub total_marks: Option<u32>,
    pub duration: Option<u32>,
    pub blooms_level: Option<BloomsLevel>,
    pub model: Option<String>,
    pub distribution: Vec<DistributionEntry>,
    /// Legacy shape, consulted only when `distribution` is empty.
    pub count: u32,
    pub question_type: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            count: 10,
            ..Default::default()
        }
    }

    pub fn uses_distribution(&self) -> bool {
        !self.distribution.is_empty()
    }

    pub fn requested_count(&self) -> u32 {
        if self.uses_distribution() {
            self.distribution.iter().map(|e| e.count).sum()
        } else {
            self.count
        }
    }

    /// Subject used for domain lookups; the topic stands in when no subject was given.
    pub fn domain_hint(&self) -> &str {
        self.subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.topic)
    }
}

/// A bucket whose final count still differs from the request after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionMismatch {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub expected: u32,
    pub actual: u32,
}

impl fmt::Display for DistributionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bucket {}/{} has {} questions, expected {}",
            self.question_type, self.difficulty, self.actual, self.expected
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub generation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub questions: Vec<Question>,
    pub warnings: Vec<DistributionMismatch>,
    pub logs: Vec<String>,
}
