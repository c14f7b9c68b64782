use crate::models::paper::{OutlinePart, PaperMetadata, PaperOutline, PaperPart};
use crate::models::question::Question;

const DEFAULT_TITLE: &str = "Examination Paper";

/// Groups questions into paper parts in A-D order. Parts without questions
/// are left out; question order inside a part follows the input.
pub fn build_outline(questions: &[Question], metadata: &PaperMetadata) -> PaperOutline {
    let parts: Vec<OutlinePart> = PaperPart::ALL
        .iter()
        .filter_map(|part| {
            let members: Vec<Question> = questions
                .iter()
                .filter(|q| PaperPart::for_type(q.question_type) == *part)
                .cloned()
                .collect();
            (!members.is_empty()).then(|| outline_part(*part, members))
        })
        .collect();

    let computed_total_marks = parts.iter().map(|p| p.total_marks).sum();
    if let Some(declared) = metadata.total_marks {
        if declared != computed_total_marks {
            tracing::warn!(
                declared,
                computed = computed_total_marks,
                "paper marks do not add up to the declared total"
            );
        }
    }

    PaperOutline {
        title: metadata
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string(),
        education_board: metadata.education_board.clone(),
        class: metadata.class.clone(),
        duration: metadata.duration,
        declared_total_marks: metadata.total_marks,
        computed_total_marks,
        parts,
    }
}

fn outline_part(part: PaperPart, questions: Vec<Question>) -> OutlinePart {
    let total_marks: u32 = questions.iter().map(|q| q.marks).sum();
    let count = questions.len();
    OutlinePart {
        part,
        title: format!("Part {:?}: {}", part, part.title()),
        heading: heading(&questions, total_marks),
        question_count: count,
        total_marks,
        questions,
    }
}

fn heading(questions: &[Question], total_marks: u32) -> String {
    let first = questions[0].marks;
    if questions.iter().all(|q| q.marks == first) {
        format!("{} × {} = {}", questions.len(), first, total_marks)
    } else {
        format!("{} questions, {} marks", questions.len(), total_marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Difficulty, QuestionType};

    fn question(question_type: QuestionType, marks: u32) -> Question {
        Question {
            text: format!("{} question worth {}", question_type, marks),
            question_type,
            difficulty: Difficulty::Medium,
            marks,
            topic: "Thermodynamics".into(),
            options: None,
            correct_answer: None,
            blooms_taxonomy: None,
            explanation: None,
            subject: None,
        }
    }

    #[test]
    fn parts_follow_type_grouping_and_skip_empty() {
        let questions = vec![
            question(QuestionType::Mcq, 1),
            question(QuestionType::Mcq, 1),
            question(QuestionType::Short, 2),
            question(QuestionType::CaseStudy, 5),
            question(QuestionType::Hots, 4),
        ];
        let outline = build_outline(&questions, &PaperMetadata::default());

        let parts: Vec<PaperPart> = outline.parts.iter().map(|p| p.part).collect();
        assert_eq!(parts, [PaperPart::A, PaperPart::B, PaperPart::D]);
        assert_eq!(outline.parts[0].heading, "2 × 1 = 2");
        assert_eq!(outline.parts[1].heading, "2 questions, 7 marks");
        assert_eq!(outline.parts[2].title, "Part D: Higher Order Thinking Questions");
        assert_eq!(outline.computed_total_marks, 13);
        assert_eq!(outline.title, "Examination Paper");
    }

    #[test]
    fn declared_total_is_reported_alongside_computed() {
        let metadata = PaperMetadata {
            title: Some("Physics Mid-term".into()),
            total_marks: Some(50),
            duration: Some(90),
            education_board: Some("CBSE".into()),
            class: Some("11".into()),
        };
        let outline = build_outline(&[question(QuestionType::Long, 10)], &metadata);
        assert_eq!(outline.declared_total_marks, Some(50));
        assert_eq!(outline.computed_total_marks, 10);
        assert_eq!(outline.parts[0].part, PaperPart::C);
        assert_eq!(outline.parts[0].heading, "1 × 10 = 10");
        assert_eq!(outline.title, "Physics Mid-term");
    }

    #[test]
    fn empty_question_list_has_no_parts() {
        let outline = build_outline(&[], &PaperMetadata::default());
        assert!(outline.parts.is_empty());
        assert_eq!(outline.computed_total_marks, 0);
    }
}
