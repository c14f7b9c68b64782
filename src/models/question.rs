use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub marks: u32,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blooms_taxonomy: Option<BloomsLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Question {
    pub fn bucket(&self) -> (QuestionType, Difficulty) {
        (self.question_type, self.difficulty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[serde(alias = "multiple_choice")]
    Mcq,
    #[serde(alias = "short_answer")]
    Short,
    #[serde(alias = "long_answer")]
    Long,
    Diagram,
    Code,
    Hots,
    CaseStudy,
}

impl QuestionType {
    /// Order in which question blocks appear in a paper.
    pub const PRECEDENCE: [QuestionType; 7] = [
        QuestionType::Mcq,
        QuestionType::Short,
        QuestionType::Long,
        QuestionType::Diagram,
        QuestionType::Code,
        QuestionType::Hots,
        QuestionType::CaseStudy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::Short => "short",
            QuestionType::Long => "long",
            QuestionType::Diagram => "diagram",
            QuestionType::Code => "code",
            QuestionType::Hots => "hots",
            QuestionType::CaseStudy => "case_study",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "multiple choice",
            QuestionType::Short => "short answer",
            QuestionType::Long => "long answer",
            QuestionType::Diagram => "diagram based",
            QuestionType::Code => "coding",
            QuestionType::Hots => "higher order thinking (HOTS)",
            QuestionType::CaseStudy => "case study",
        }
    }

    pub fn precedence(&self) -> usize {
        Self::PRECEDENCE
            .iter()
            .position(|t| t == self)
            .unwrap_or(Self::PRECEDENCE.len())
    }

    /// Marks awarded for an easy question of this type before difficulty scaling.
    pub fn base_marks(&self) -> f64 {
        match self {
            QuestionType::Mcq => 1.0,
            QuestionType::Short => 2.0,
            QuestionType::Long => 5.0,
            QuestionType::Diagram => 3.0,
            QuestionType::Code => 4.0,
            QuestionType::Hots => 4.0,
            QuestionType::CaseStudy => 5.0,
        }
    }

    /// Lenient parse used for model output and legacy request fields.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match key.as_str() {
            "mcq" | "mcqs" | "multiple_choice" | "multiplechoice" | "objective" => {
                Some(QuestionType::Mcq)
            }
            "short" | "short_answer" | "shortanswer" | "very_short" => Some(QuestionType::Short),
            "long" | "long_answer" | "longanswer" | "essay" | "descriptive" => {
                Some(QuestionType::Long)
            }
            "diagram" | "diagram_based" | "diagrammatic" => Some(QuestionType::Diagram),
            "code" | "coding" | "programming" => Some(QuestionType::Code),
            "hots" | "higher_order" | "higher_order_thinking" => Some(QuestionType::Hots),
            "case_study" | "casestudy" | "case_based" => Some(QuestionType::CaseStudy),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn marks_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "easy" | "simple" | "basic" | "low" => Some(Difficulty::Easy),
            "medium" | "moderate" | "intermediate" | "average" => Some(Difficulty::Medium),
            "hard" | "difficult" | "advanced" | "challenging" | "high" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomsLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloomsLevel::Remember => "remember",
            BloomsLevel::Understand => "understand",
            BloomsLevel::Apply => "apply",
            BloomsLevel::Analyze => "analyze",
            BloomsLevel::Evaluate => "evaluate",
            BloomsLevel::Create => "create",
        }
    }

    /// Accepts verb forms and British spellings ("Analysing", "remembering").
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        let table = [
            ("remem", BloomsLevel::Remember),
            ("recall", BloomsLevel::Remember),
            ("knowledge", BloomsLevel::Remember),
            ("underst", BloomsLevel::Understand),
            ("compreh", BloomsLevel::Understand),
            ("appl", BloomsLevel::Apply),
            ("analy", BloomsLevel::Analyze),
            ("evalu", BloomsLevel::Evaluate),
            ("creat", BloomsLevel::Create),
            ("synth", BloomsLevel::Create),
        ];
        table
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix))
            .map(|(_, level)| *level)
    }
}

impl fmt::Display for BloomsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_type_parsing_accepts_common_spellings() {
        assert_eq!(QuestionType::parse_loose("Multiple Choice"), Some(QuestionType::Mcq));
        assert_eq!(QuestionType::parse_loose("short-answer"), Some(QuestionType::Short));
        assert_eq!(QuestionType::parse_loose("Case Study"), Some(QuestionType::CaseStudy));
        assert_eq!(QuestionType::parse_loose("riddle"), None);
    }

    #[test]
    fn precedence_matches_paper_order() {
        assert!(QuestionType::Mcq.precedence() < QuestionType::Short.precedence());
        assert!(QuestionType::Hots.precedence() < QuestionType::CaseStudy.precedence());
    }

    #[test]
    fn serializes_in_camel_case_without_empty_fields() {
        let q = Question {
            text: "Define entropy.".into(),
            question_type: QuestionType::Short,
            difficulty: Difficulty::Easy,
            marks: 2,
            topic: "Thermodynamics".into(),
            options: None,
            correct_answer: None,
            blooms_taxonomy: Some(BloomsLevel::Remember),
            explanation: None,
            subject: None,
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "short");
        assert_eq!(value["bloomsTaxonomy"], "remember");
        assert!(value.get("options").is_none());
        assert!(value.get("correctAnswer").is_none());
    }

    #[test]
    fn blooms_parsing_handles_verb_forms() {
        assert_eq!(BloomsLevel::parse_loose("Analysing"), Some(BloomsLevel::Analyze));
        assert_eq!(BloomsLevel::parse_loose("apply"), Some(BloomsLevel::Apply));
        assert_eq!(BloomsLevel::parse_loose("n/a"), None);
    }
}
