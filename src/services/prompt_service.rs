use crate::models::generation::GenerationRequest;
use crate::services::subject_bank;
use std::fmt::Write as _;

const SYSTEM_PROMPT: &str = "You are an experienced examiner who writes academic question papers. \
You always answer with a single strict JSON object and nothing else.";

const SCHEMA_RULES: &str = r#"OUTPUT FORMAT (strict):
- Respond with ONE JSON object of the form {"questions": [ ... ]} and nothing before or after it.
- Do not wrap the JSON in markdown and do not add commentary.
- Never put line breaks inside string values; keep every string on one line.
- Escape any double quote that appears inside a string as \".
- Each question object has exactly these fields:
  "text" (string), "type" (one of mcq, short, long, diagram, code, hots, case_study),
  "difficulty" (one of easy, medium, hard), "marks" (integer),
  "options" (array of exactly 4 strings, mcq only), "correctAnswer" (string equal to one of the options, mcq only),
  "bloomsTaxonomy" (one of remember, understand, apply, analyze, evaluate, create),
  "explanation" (string, one sentence)."#;

const WORKED_EXAMPLES: &str = r#"EXAMPLES of well-formed questions (for format only, do not reuse their content):
{"text": "A car accelerates uniformly from 10 m/s to 30 m/s in 5 s. What is its acceleration?", "type": "mcq", "difficulty": "easy", "marks": 1, "options": ["2 m/s^2", "6 m/s^2", "8 m/s^2", "4 m/s^2"], "correctAnswer": "4 m/s^2", "bloomsTaxonomy": "apply", "explanation": "a = (30 - 10) / 5 = 4 m/s^2."}
{"text": "Explain why a heavier pendulum bob does not change the period of a simple pendulum.", "type": "short", "difficulty": "medium", "marks": 3, "bloomsTaxonomy": "understand", "explanation": "The period depends only on length and gravitational acceleration."}"#;

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let bundle = subject_bank::lookup(request.domain_hint());
    let mut prompt = String::new();

    let subject = request.subject.as_deref().unwrap_or("General");
    let _ = write!(
        prompt,
        "Generate exactly {} exam questions on the topic \"{}\" for the subject {}",
        request.requested_count(),
        request.topic,
        subject
    );
    if let Some(level) = request.educational_level.as_deref() {
        let _ = write!(prompt, " at the {} level", level);
    }
    prompt.push_str(".\n\n");

    if let Some(description) = non_blank(request.description.as_deref()) {
        let _ = writeln!(prompt, "Paper description: {}", description);
    }
    if let Some(syllabus) = non_blank(request.syllabus.as_deref()) {
        let _ = writeln!(prompt, "Syllabus to cover: {}", syllabus);
    }
    if let Some(level) = request.blooms_level {
        let _ = writeln!(
            prompt,
            "Target Bloom's taxonomy level: {} (use it for most questions).",
            level
        );
    }
    if let Some(total) = request.total_marks {
        let _ = writeln!(prompt, "The paper carries {} marks in total.", total);
    }
    if let Some(duration) = request.duration {
        let _ = writeln!(
            prompt,
            "The paper must be answerable within {} minutes.",
            duration
        );
    }

    prompt.push_str("\nQUALITY RULES:\n");
    prompt.push_str("- Do not use generic placeholders such as \"Option A\", \"Sample question\" or \"[insert]\".\n");
    prompt.push_str("- Do not use \"All of the above\" or \"None of the above\" as options.\n");
    let _ = writeln!(
        prompt,
        "- Do not write the phrase \"{}\" verbatim inside any question text; ask about its concepts directly.",
        request.topic
    );
    prompt.push_str("- Every question must be self-contained and unambiguous with a single correct answer.\n");

    let _ = writeln!(prompt, "\nSUBJECT RULES ({}):", bundle.key);
    for rule in bundle.prompt_rules {
        let _ = writeln!(prompt, "- {}", rule);
    }

    prompt.push('\n');
    if request.uses_distribution() {
        prompt.push_str("REQUIRED DISTRIBUTION (follow exactly, no more and no fewer):\n");
        for (idx, entry) in request.distribution.iter().enumerate() {
            let _ = write!(
                prompt,
                "{}. {} {} question(s) of type \"{}\", difficulty \"{}\"",
                idx + 1,
                entry.count,
                entry.question_type.label(),
                entry.question_type,
                entry.difficulty
            );
            match entry.marks {
                Some(marks) => {
                    let _ = writeln!(prompt, ", {} marks each.", marks);
                }
                None => prompt.push_str(".\n"),
            }
        }
    } else {
        prompt.push_str("DISTRIBUTION:\n");
        match request.question_type {
            Some(question_type) => {
                let _ = writeln!(
                    prompt,
                    "- All {} questions must be of type \"{}\".",
                    request.count, question_type
                );
            }
            None => {
                let _ = writeln!(
                    prompt,
                    "- Split the {} questions proportionally across mcq, short and long types, with mcq as the largest share.",
                    request.count
                );
            }
        }
        match request.difficulty {
            Some(difficulty) => {
                let _ = writeln!(prompt, "- Every question must be \"{}\".", difficulty);
            }
            None => prompt.push_str(
                "- Mix difficulties: roughly 40% easy, 40% medium and 20% hard.\n",
            ),
        }
    }

    prompt.push('\n');
    prompt.push_str(SCHEMA_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(WORKED_EXAMPLES);
    prompt
}

pub fn build_solve_prompt(question_text: &str, subject: Option<&str>) -> String {
    let subject = non_blank(subject).unwrap_or("General");
    format!(
        "Solve the following {} exam question. Give a clear, step-by-step answer suitable for a model answer key, \
and finish with a one-line final answer.\n\nQuestion: {}",
        subject,
        question_text.trim()
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
