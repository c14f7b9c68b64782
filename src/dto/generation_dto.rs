use crate::error::{Error, Result};
use crate::models::generation::{DistributionEntry, GenerationRequest};
use crate::models::paper::PaperMetadata;
use crate::models::question::{BloomsLevel, Difficulty, Question, QuestionType};
use serde::{Deserialize, Serialize};
use validator::Validate;

const DEFAULT_COUNT: u32 = 10;
/// Shape words that mean "no constraint" in the legacy request form.
const UNCONSTRAINED: [&str; 3] = ["mixed", "any", "all"];

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntryPayload {
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub question_type: String,
    #[validate(length(min = 1))]
    pub difficulty: String,
    #[validate(range(min = 1, max = 25, message = "Each bucket may request 1 to 25 questions"))]
    pub count: u32,
    #[validate(range(min = 1, message = "Marks must be at least 1"))]
    pub marks: Option<u32>,
}

impl DistributionEntryPayload {
    fn into_entry(self) -> Result<DistributionEntry> {
        let question_type = QuestionType::parse_loose(&self.question_type).ok_or_else(|| {
            Error::BadRequest(format!("Unknown question type: {}", self.question_type))
        })?;
        let difficulty = Difficulty::parse_loose(&self.difficulty).ok_or_else(|| {
            Error::BadRequest(format!("Unknown difficulty: {}", self.difficulty))
        })?;
        Ok(DistributionEntry {
            question_type,
            difficulty,
            count: self.count,
            marks: self.marks,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsPayload {
    #[validate(length(min = 1, max = 300))]
    pub topic: String,
    #[validate(range(min = 1, max = 100))]
    pub count: Option<u32>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub difficulty: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "trim_optional_string")]
    pub question_type: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub blooms_level: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub model: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub question_distribution: Vec<DistributionEntryPayload>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub syllabus: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub educational_level: Option<String>,
    #[validate(range(min = 1))]
    pub total_marks: Option<u32>,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: Option<u32>,
}

impl GenerateQuestionsPayload {
    pub fn into_request(self) -> Result<GenerationRequest> {
        let topic = self.topic.trim().to_string();
        if topic.is_empty() {
            return Err(Error::BadRequest("Topic cannot be empty".to_string()));
        }

        let question_type = match constrained(self.question_type.as_deref()) {
            Some(raw) => Some(
                QuestionType::parse_loose(raw)
                    .ok_or_else(|| Error::BadRequest(format!("Unknown question type: {}", raw)))?,
            ),
            None => None,
        };
        let difficulty = match constrained(self.difficulty.as_deref()) {
            Some(raw) => Some(
                Difficulty::parse_loose(raw)
                    .ok_or_else(|| Error::BadRequest(format!("Unknown difficulty: {}", raw)))?,
            ),
            None => None,
        };
        let distribution = self
            .question_distribution
            .into_iter()
            .map(DistributionEntryPayload::into_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationRequest {
            topic,
            subject: self.subject,
            educational_level: self.educational_level,
            description: self.description,
            syllabus: self.syllabus,
            total_marks: self.total_marks,
            duration: self.duration,
            blooms_level: self.blooms_level.as_deref().and_then(BloomsLevel::parse_loose),
            model: self.model,
            distribution,
            count: self.count.unwrap_or(DEFAULT_COUNT),
            question_type,
            difficulty,
        })
    }
}

fn constrained(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !UNCONSTRAINED.contains(&v.to_ascii_lowercase().as_str()))
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SolvePayload {
    #[validate(length(min = 1, max = 5000))]
    pub question_text: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OutlinePayload {
    #[validate(length(min = 1, message = "At least one question is required"))]
    pub questions: Vec<Question>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub title: Option<String>,
    #[validate(range(min = 1))]
    pub total_marks: Option<u32>,
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub education_board: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub class: Option<String>,
}

impl OutlinePayload {
    pub fn metadata(&self) -> PaperMetadata {
        PaperMetadata {
            title: self.title.clone(),
            total_marks: self.total_marks,
            duration: self.duration,
            education_board: self.education_board.clone(),
            class: self.class.clone(),
        }
    }
}

fn trim_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
