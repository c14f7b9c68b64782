use crate::models::question::{Question, QuestionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaperPart {
    A,
    B,
    C,
    D,
}

impl PaperPart {
    pub const ALL: [PaperPart; 4] = [PaperPart::A, PaperPart::B, PaperPart::C, PaperPart::D];

    pub fn for_type(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Mcq => PaperPart::A,
            QuestionType::Short
            | QuestionType::Diagram
            | QuestionType::Code
            | QuestionType::CaseStudy => PaperPart::B,
            QuestionType::Long => PaperPart::C,
            QuestionType::Hots => PaperPart::D,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaperPart::A => "Multiple Choice Questions",
            PaperPart::B => "Short and Applied Questions",
            PaperPart::C => "Long Answer Questions",
            PaperPart::D => "Higher Order Thinking Questions",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMetadata {
    pub title: Option<String>,
    pub total_marks: Option<u32>,
    /// Minutes.
    pub duration: Option<u32>,
    pub education_board: Option<String>,
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlinePart {
    pub part: PaperPart,
    pub title: String,
    pub heading: String,
    pub question_count: usize,
    pub total_marks: u32,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperOutline {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub declared_total_marks: Option<u32>,
    pub computed_total_marks: u32,
    pub parts: Vec<OutlinePart>,
}
