use crate::models::question::{BloomsLevel, Difficulty, Question, QuestionType};
use serde_json::Value as JsonValue;

const MCQ_OPTION_COUNT: usize = 4;
const OPTION_LABELS: [&str; MCQ_OPTION_COUNT] = ["A", "B", "C", "D"];

/// Marks for a question without an explicit value: base marks for the type
/// scaled by difficulty, rounded to the nearest integer.
pub fn default_marks(question_type: QuestionType, difficulty: Difficulty) -> u32 {
    let marks = (question_type.base_marks() * difficulty.marks_multiplier()).round();
    (marks as u32).max(1)
}

/// Coerces loose records into canonical questions. Canonical text fields
/// (text, options, topic, explanation, subject) carry no surrounding
/// whitespace, so normalizing the output a second time changes nothing.
pub fn normalize_questions(raw: &[JsonValue], topic: &str) -> Vec<Question> {
    let questions: Vec<Question> = raw.iter().map(|v| coerce_question(v, topic)).collect();
    let placeholder = placeholder_text(topic);
    let placeholders = questions.iter().filter(|q| q.text == placeholder).count();
    if placeholders > 0 {
        tracing::warn!(
            placeholders,
            total = questions.len(),
            "model returned questions without text"
        );
    }
    questions
}

fn placeholder_text(topic: &str) -> String {
    format!("[Question text unavailable for {}]", topic)
}

fn coerce_question(v: &JsonValue, topic: &str) -> Question {
    let text = first_str(v, &["text", "question", "questionText", "question_text"])
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| placeholder_text(topic));

    let question_type = first_str(v, &["type", "questionType", "question_type"])
        .and_then(QuestionType::parse_loose)
        .unwrap_or(QuestionType::Mcq);

    let difficulty = first_str(v, &["difficulty", "level"])
        .and_then(Difficulty::parse_loose)
        .unwrap_or(Difficulty::Medium);

    let marks = first_value(v, &["marks", "points"])
        .and_then(positive_integer)
        .unwrap_or_else(|| default_marks(question_type, difficulty));

    let (options, correct_answer) = if question_type == QuestionType::Mcq {
        let options = coerce_options(v.get("options"));
        let answer = resolve_answer(
            first_value(v, &["correctAnswer", "correct_answer", "answer"]),
            &options,
        );
        (Some(options), Some(answer))
    } else {
        (None, None)
    };

    Question {
        text,
        question_type,
        difficulty,
        marks,
        topic: first_str(v, &["topic"])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(topic)
            .to_string(),
        options,
        correct_answer,
        blooms_taxonomy: first_str(v, &["bloomsTaxonomy", "blooms_taxonomy", "bloomsLevel"])
            .and_then(BloomsLevel::parse_loose),
        explanation: first_str(v, &["explanation"])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        subject: first_str(v, &["subject"])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

fn first_value<'a>(v: &'a JsonValue, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter().find_map(|k| v.get(*k)).filter(|v| !v.is_null())
}

fn first_str<'a>(v: &'a JsonValue, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| v.get(*k).and_then(|s| s.as_str()))
}

fn positive_integer(v: &JsonValue) -> Option<u32> {
    let n = match v {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 1.0).then(|| n.round() as u32)
}

/// Exactly four options: extras are truncated, gaps are filled with `Option X` labels.
fn coerce_options(raw: Option<&JsonValue>) -> Vec<String> {
    let mut options: Vec<String> = raw
        .and_then(|o| o.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    JsonValue::String(s) => Some(s.trim().to_string()),
                    JsonValue::Number(n) => Some(n.to_string()),
                    JsonValue::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    options.truncate(MCQ_OPTION_COUNT);
    for label in OPTION_LABELS.iter().skip(options.len()) {
        options.push(format!("Option {}", label));
    }
    options
}

/// Keeps the answer when it names one of the options; an index (0-based) or a
/// letter A-D is mapped onto the options; anything else becomes the first option.
fn resolve_answer(raw: Option<&JsonValue>, options: &[String]) -> String {
    let by_value = |s: &str| options.iter().find(|o| o.as_str() == s.trim()).cloned();

    let resolved = match raw {
        Some(JsonValue::String(s)) => by_value(s).or_else(|| {
            let letter = s.trim().trim_end_matches(&[')', '.'][..]).to_uppercase();
            OPTION_LABELS
                .iter()
                .position(|l| *l == letter)
                .and_then(|idx| options.get(idx).cloned())
        }),
        Some(JsonValue::Number(n)) => by_value(&n.to_string()).or_else(|| {
            n.as_u64()
                .and_then(|idx| options.get(idx as usize).cloned())
        }),
        _ => None,
    };

    resolved.unwrap_or_else(|| options[0].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_fields() {
        let questions = normalize_questions(&[json!({})], "Optics");
        let q = &questions[0];
        assert_eq!(q.text, "[Question text unavailable for Optics]");
        assert_eq!(q.question_type, QuestionType::Mcq);
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.marks, 2);
        assert_eq!(q.topic, "Optics");
        assert_eq!(
            q.options.as_deref().unwrap(),
            ["Option A", "Option B", "Option C", "Option D"]
        );
        assert_eq!(q.correct_answer.as_deref(), Some("Option A"));
    }

    #[test]
    fn default_marks_scale_with_difficulty() {
        assert_eq!(default_marks(QuestionType::Mcq, Difficulty::Easy), 1);
        assert_eq!(default_marks(QuestionType::Short, Difficulty::Medium), 3);
        assert_eq!(default_marks(QuestionType::Long, Difficulty::Medium), 8);
        assert_eq!(default_marks(QuestionType::Long, Difficulty::Hard), 10);
        assert_eq!(default_marks(QuestionType::Diagram, Difficulty::Medium), 5);
    }

    #[test]
    fn options_are_padded_and_truncated_to_four() {
        let padded = normalize_questions(
            &[json!({"text": "Pick one", "options": ["x", "y"], "correctAnswer": "y"})],
            "T",
        );
        assert_eq!(
            padded[0].options.as_deref().unwrap(),
            ["x", "y", "Option C", "Option D"]
        );
        assert_eq!(padded[0].correct_answer.as_deref(), Some("y"));

        let truncated = normalize_questions(
            &[json!({"text": "Pick one", "options": ["a", "b", "c", "d", "e"], "correctAnswer": "e"})],
            "T",
        );
        assert_eq!(truncated[0].options.as_ref().unwrap().len(), 4);
        assert_eq!(truncated[0].correct_answer.as_deref(), Some("a"));
    }

    #[test]
    fn answer_given_as_index_or_letter_is_resolved() {
        let raw = [
            json!({"text": "q1", "options": ["a", "b", "c", "d"], "correct_answer": 2}),
            json!({"text": "q2", "options": ["a", "b", "c", "d"], "answer": "D"}),
            json!({"text": "q3", "options": ["1", "2", "3", "4"], "correctAnswer": 3}),
        ];
        let questions = normalize_questions(&raw, "T");
        assert_eq!(questions[0].correct_answer.as_deref(), Some("c"));
        assert_eq!(questions[1].correct_answer.as_deref(), Some("d"));
        // A numeric answer that matches an option's text wins over the index reading.
        assert_eq!(questions[2].correct_answer.as_deref(), Some("3"));
    }

    #[test]
    fn written_questions_lose_options() {
        let questions = normalize_questions(
            &[json!({"question": "Explain refraction.", "type": "long_answer", "difficulty": "Hard",
                     "marks": "6", "options": ["a"], "correctAnswer": "a", "bloomsTaxonomy": "Understanding"})],
            "Optics",
        );
        let q = &questions[0];
        assert_eq!(q.question_type, QuestionType::Long);
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.marks, 6);
        assert!(q.options.is_none());
        assert!(q.correct_answer.is_none());
        assert_eq!(q.blooms_taxonomy, Some(BloomsLevel::Understand));
    }

    #[test]
    fn invalid_marks_fall_back_to_default() {
        let questions = normalize_questions(
            &[json!({"text": "q", "type": "hots", "difficulty": "hard", "marks": 0})],
            "T",
        );
        assert_eq!(questions[0].marks, 8);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_once() {
        let first = normalize_questions(
            &[json!({"text": "  Which gas do plants absorb?\n", "options": [" O2", "CO2 ", "N2", "H2"],
                     "correctAnswer": " CO2", "explanation": " Carbon fixation. "})],
            "Photosynthesis",
        );
        assert_eq!(first[0].text, "Which gas do plants absorb?");
        assert_eq!(first[0].options.as_deref().unwrap()[..2], ["O2", "CO2"]);
        assert_eq!(first[0].correct_answer.as_deref(), Some("CO2"));
        assert_eq!(first[0].explanation.as_deref(), Some("Carbon fixation."));

        let raw: Vec<JsonValue> = first
            .iter()
            .map(|q| serde_json::to_value(q).unwrap())
            .collect();
        assert_eq!(normalize_questions(&raw, "Photosynthesis"), first);
    }

    #[test]
    fn canonical_questions_are_unchanged() {
        let canonical = vec![
            Question {
                text: "Which gas do plants absorb?".into(),
                question_type: QuestionType::Mcq,
                difficulty: Difficulty::Easy,
                marks: 1,
                topic: "Photosynthesis".into(),
                options: Some(vec!["O2".into(), "N2".into(), "H2".into(), "CO2".into()]),
                correct_answer: Some("CO2".into()),
                blooms_taxonomy: Some(BloomsLevel::Remember),
                explanation: Some("Plants fix carbon dioxide.".into()),
                subject: Some("Biology".into()),
            },
            Question {
                text: "Describe the light reactions.".into(),
                question_type: QuestionType::CaseStudy,
                difficulty: Difficulty::Hard,
                marks: 7,
                topic: "Photosynthesis".into(),
                options: None,
                correct_answer: None,
                blooms_taxonomy: None,
                explanation: None,
                subject: None,
            },
        ];
        let raw: Vec<JsonValue> = canonical
            .iter()
            .map(|q| serde_json::to_value(q).unwrap())
            .collect();
        assert_eq!(normalize_questions(&raw, "Something else"), canonical);
    }
}
