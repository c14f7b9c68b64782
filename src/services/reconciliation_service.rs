use crate::models::generation::{DistributionEntry, DistributionMismatch};
use crate::models::question::{Difficulty, Question, QuestionType};
use crate::services::normalization_service::default_marks;
use crate::services::template_service::fallback_question;
use std::collections::{HashMap, HashSet, VecDeque};

type Bucket = (QuestionType, Difficulty);

/// Template draws allowed per synthesized question before a variant suffix is appended.
const MAX_REGENERATION_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub questions: Vec<Question>,
    pub warnings: Vec<DistributionMismatch>,
    pub synthesized: usize,
    pub discarded: usize,
}

/// Tracks texts already used in each bucket and the next template index to try.
#[derive(Default)]
struct Synthesizer<'a> {
    topic: &'a str,
    subject: Option<&'a str>,
    seen: HashMap<Bucket, HashSet<String>>,
    variation: HashMap<Bucket, usize>,
}

impl<'a> Synthesizer<'a> {
    fn new(topic: &'a str, subject: Option<&'a str>) -> Self {
        Self {
            topic,
            subject: subject.map(str::trim).filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    fn remember(&mut self, question: &Question) {
        self.seen
            .entry(question.bucket())
            .or_default()
            .insert(question.text.clone());
    }

    fn synthesize(&mut self, bucket: Bucket, marks: u32) -> Question {
        let (question_type, difficulty) = bucket;
        let (topic, subject) = (self.topic, self.subject);
        let mut variation = self.variation.get(&bucket).copied().unwrap_or(0);

        let mut draw = || {
            let q = fallback_question(topic, question_type, difficulty, marks, subject, variation);
            variation += 1;
            q
        };

        let seen = self.seen.entry(bucket).or_default();
        let mut candidate = draw();
        let mut attempts = 0;
        while seen.contains(&candidate.text) && attempts < MAX_REGENERATION_ATTEMPTS {
            candidate = draw();
            attempts += 1;
        }
        self.variation.insert(bucket, variation);
        if seen.contains(&candidate.text) {
            let base = candidate.text.clone();
            let mut n = 2;
            while seen.contains(&variant_text(&base, n)) {
                n += 1;
            }
            candidate.text = variant_text(&base, n);
        }

        candidate.marks = marks;
        if let Some(subject) = self.subject {
            candidate.subject = Some(subject.to_string());
        }
        seen.insert(candidate.text.clone());
        candidate
    }
}

fn variant_text(base: &str, n: usize) -> String {
    format!("{} (Variant {})", base, n)
}

/// Forces `questions` to match `distribution` exactly: surplus questions in a
/// bucket are dropped (first N kept in input order), missing ones are
/// synthesized, and requested marks overwrite whatever the model assigned.
pub fn reconcile(
    questions: Vec<Question>,
    distribution: &[DistributionEntry],
    topic: &str,
    subject: Option<&str>,
) -> Reconciliation {
    let input_len = questions.len();
    let mut pools: HashMap<Bucket, VecDeque<usize>> = HashMap::new();
    for (idx, q) in questions.iter().enumerate() {
        pools.entry(q.bucket()).or_default().push_back(idx);
    }
    let mut slots: Vec<Option<Question>> = questions.into_iter().map(Some).collect();

    let mut synthesizer = Synthesizer::new(topic, subject);
    let mut placed: Vec<(usize, Question)> = Vec::with_capacity(input_len);
    let mut synthesized = 0;

    for entry in distribution {
        let bucket = (entry.question_type, entry.difficulty);
        let wanted = entry.count as usize;
        let mut taken = 0;

        if let Some(pool) = pools.get_mut(&bucket) {
            while taken < wanted {
                let Some(idx) = pool.pop_front() else { break };
                let Some(mut question) = slots[idx].take() else { continue };
                if let Some(marks) = entry.marks {
                    question.marks = marks;
                }
                synthesizer.remember(&question);
                placed.push((idx, question));
                taken += 1;
            }
        }

        let marks = entry
            .marks
            .unwrap_or_else(|| default_marks(entry.question_type, entry.difficulty));
        for _ in taken..wanted {
            let question = synthesizer.synthesize(bucket, marks);
            placed.push((input_len + synthesized, question));
            synthesized += 1;
        }

        if taken < wanted {
            tracing::info!(
                question_type = %entry.question_type,
                difficulty = %entry.difficulty,
                requested = wanted,
                from_model = taken,
                "synthesized fallback questions for bucket"
            );
        }
    }

    let discarded = slots.iter().filter(|s| s.is_some()).count();
    if discarded > 0 {
        tracing::debug!(discarded, "dropped surplus or unrequested questions");
    }

    let questions = order_by_type(placed);
    let warnings = verify(&questions, distribution);
    Reconciliation {
        questions,
        warnings,
        synthesized,
        discarded,
    }
}

/// Legacy requests carry only a total count: keep the first `count`
/// questions and pad a shortfall with fallbacks of the requested shape.
pub fn reconcile_count(
    questions: Vec<Question>,
    count: u32,
    question_type: Option<QuestionType>,
    difficulty: Option<Difficulty>,
    topic: &str,
    subject: Option<&str>,
) -> Reconciliation {
    let wanted = count as usize;
    let discarded = questions.len().saturating_sub(wanted);
    let mut synthesizer = Synthesizer::new(topic, subject);

    let mut placed: Vec<(usize, Question)> = questions
        .into_iter()
        .take(wanted)
        .enumerate()
        .inspect(|(_, q)| synthesizer.remember(q))
        .collect();

    let bucket = (
        question_type.unwrap_or(QuestionType::Mcq),
        difficulty.unwrap_or(Difficulty::Medium),
    );
    let marks = default_marks(bucket.0, bucket.1);
    let mut synthesized = 0;
    while placed.len() < wanted {
        let question = synthesizer.synthesize(bucket, marks);
        placed.push((placed.len(), question));
        synthesized += 1;
    }

    Reconciliation {
        questions: order_by_type(placed),
        warnings: Vec::new(),
        synthesized,
        discarded,
    }
}

/// Stable ordering by type precedence; within a type the order key decides,
/// so model questions keep their input order and synthesized ones follow.
fn order_by_type(mut placed: Vec<(usize, Question)>) -> Vec<Question> {
    placed.sort_by_key(|(key, q)| (q.question_type.precedence(), *key));
    placed.into_iter().map(|(_, q)| q).collect()
}

fn verify(questions: &[Question], distribution: &[DistributionEntry]) -> Vec<DistributionMismatch> {
    let mut expected: Vec<(Bucket, u32)> = Vec::new();
    for entry in distribution {
        let bucket = (entry.question_type, entry.difficulty);
        match expected.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, count)) => *count += entry.count,
            None => expected.push((bucket, entry.count)),
        }
    }

    let mut actual: HashMap<Bucket, u32> = HashMap::new();
    for q in questions {
        *actual.entry(q.bucket()).or_default() += 1;
    }

    let mut warnings: Vec<DistributionMismatch> = expected
        .iter()
        .filter_map(|((question_type, difficulty), want)| {
            let got = actual.remove(&(*question_type, *difficulty)).unwrap_or(0);
            (got != *want).then(|| DistributionMismatch {
                question_type: *question_type,
                difficulty: *difficulty,
                expected: *want,
                actual: got,
            })
        })
        .collect();
    warnings.extend(actual.into_iter().map(|((question_type, difficulty), got)| {
        DistributionMismatch {
            question_type,
            difficulty,
            expected: 0,
            actual: got,
        }
    }));

    for warning in &warnings {
        tracing::warn!(%warning, "distribution mismatch after reconciliation");
    }
    warnings
}
