use crate::models::question::{BloomsLevel, Difficulty, Question, QuestionType};
use crate::services::subject_bank;

/// Builds a gap-filling question from the subject bank. Deterministic for a
/// given input; `variation` picks the template so repeated calls differ.
pub fn fallback_question(
    topic: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
    marks: u32,
    subject: Option<&str>,
    variation: usize,
) -> Question {
    let subject = subject.map(str::trim).filter(|s| !s.is_empty());
    let bundle = subject_bank::lookup(subject.unwrap_or(topic));

    let templates = if question_type == QuestionType::Mcq {
        bundle.mcq_templates
    } else {
        bundle.written_templates
    };
    let stem = templates[variation % templates.len()].replace("{topic}", topic);
    let text = match question_type {
        QuestionType::Mcq => stem,
        QuestionType::CaseStudy => format!("Case study: {}{}", stem, instruction_suffix(question_type)),
        _ => format!("{}{}", stem, instruction_suffix(question_type)),
    };

    let (options, correct_answer, explanation) = if question_type == QuestionType::Mcq {
        let options: Vec<String> = bundle
            .options_for(&text)
            .iter()
            .map(|o| o.to_string())
            .collect();
        let answer = options[options.len() - 1].clone();
        let explanation = format!("Auto-generated question; the expected answer is \"{}\".", answer);
        (Some(options), Some(answer), explanation)
    } else {
        let explanation = format!(
            "Auto-generated question; mark using the standard scheme for {} questions.",
            question_type.label()
        );
        (None, None, explanation)
    };

    Question {
        text,
        question_type,
        difficulty,
        marks,
        topic: topic.to_string(),
        options,
        correct_answer,
        blooms_taxonomy: Some(blooms_for(question_type, difficulty)),
        explanation: Some(explanation),
        subject: subject.map(str::to_string),
    }
}

fn instruction_suffix(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Mcq => "",
        QuestionType::Short => " Answer in two or three sentences.",
        QuestionType::Long => " Answer in detail with suitable examples.",
        QuestionType::Diagram => " Draw a neat, labelled diagram to support your answer.",
        QuestionType::Code => " Write the code and explain its output.",
        QuestionType::Hots => " Justify your reasoning with evidence.",
        QuestionType::CaseStudy => " Analyse the situation and support your answer.",
    }
}

fn blooms_for(question_type: QuestionType, difficulty: Difficulty) -> BloomsLevel {
    match (question_type, difficulty) {
        (QuestionType::Hots, _) => BloomsLevel::Evaluate,
        (QuestionType::CaseStudy, _) => BloomsLevel::Analyze,
        (_, Difficulty::Easy) => BloomsLevel::Remember,
        (_, Difficulty::Medium) => BloomsLevel::Apply,
        (_, Difficulty::Hard) => BloomsLevel::Analyze,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcq_fallback_has_four_options_and_last_is_correct() {
        let q = fallback_question(
            "Linear equations",
            QuestionType::Mcq,
            Difficulty::Easy,
            2,
            Some("Mathematics"),
            0,
        );
        let options = q.options.as_ref().unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(q.correct_answer.as_deref(), Some(options[3].as_str()));
        assert_eq!(q.correct_answer.as_deref(), Some("x = 5"));
        assert!(q.text.contains("Linear equations"));
        assert_eq!(q.marks, 2);
        assert_eq!(q.subject.as_deref(), Some("Mathematics"));
    }

    #[test]
    fn variation_cycles_through_templates() {
        let first = fallback_question("Optics", QuestionType::Long, Difficulty::Hard, 10, Some("Physics"), 0);
        let second = fallback_question("Optics", QuestionType::Long, Difficulty::Hard, 10, Some("Physics"), 1);
        let wrapped = fallback_question(
            "Optics",
            QuestionType::Long,
            Difficulty::Hard,
            10,
            Some("Physics"),
            subject_bank::PHYSICS.written_templates.len(),
        );
        assert_ne!(first.text, second.text);
        assert_eq!(first.text, wrapped.text);
        assert!(first.options.is_none());
        assert!(first.correct_answer.is_none());
    }

    #[test]
    fn unmatched_subject_uses_generic_bank() {
        let q = fallback_question("Baroque music", QuestionType::Mcq, Difficulty::Medium, 1, Some("Music"), 0);
        assert_eq!(
            q.text,
            "Which statement best describes the central idea of Baroque music?"
        );
        assert_eq!(q.options.as_ref().unwrap().len(), 4);
        assert_eq!(q.correct_answer.as_deref(), Some(subject_bank::FALLBACK_OPTIONS[3]));
    }

    #[test]
    fn written_types_carry_type_instructions() {
        let diagram = fallback_question("Cells", QuestionType::Diagram, Difficulty::Medium, 3, Some("Biology"), 0);
        assert!(diagram.text.ends_with("labelled diagram to support your answer."));
        let case = fallback_question("Cells", QuestionType::CaseStudy, Difficulty::Hard, 5, None, 0);
        assert!(case.text.starts_with("Case study: "));
        assert_eq!(case.blooms_taxonomy, Some(BloomsLevel::Analyze));
        assert!(case.subject.is_none());
    }
}
