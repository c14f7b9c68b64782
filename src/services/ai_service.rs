use crate::error::{Error, Result};
use crate::models::generation::{GenerationOutput, GenerationRequest};
use crate::services::completion_client::{ChatMessage, CompletionClient, CompletionRequest};
use crate::services::reconciliation_service::{self, Reconciliation};
use crate::services::{extraction_service, normalization_service, prompt_service};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const GENERATION_TEMPERATURE: f32 = 0.7;
const SOLVE_TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;

#[derive(Clone)]
pub struct AIService {
    client: Arc<dyn CompletionClient>,
    default_model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AIService {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        default_model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            default_model,
            max_tokens,
            timeout,
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        let mut logs: Vec<String> = vec![];
        let requested = request.requested_count();
        logs.push(format!(
            "Starting generation of {} questions on \"{}\".",
            requested, request.topic
        ));

        let prompt = prompt_service::build_generation_prompt(request);
        let completion = CompletionRequest {
            messages: vec![
                ChatMessage::system(prompt_service::system_prompt()),
                ChatMessage::user(prompt),
            ],
            model: self.model_for(request.model.as_deref()),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: self.max_tokens,
            top_p: TOP_P,
        };

        logs.push(format!("Sending request to model {}...", completion.model));
        let raw = self.complete(completion).await?;
        logs.push(format!(
            "Response received ({} chars). Extracting JSON...",
            raw.len()
        ));

        let payload = extraction_service::extract_json(&raw)?;
        let records = extraction_service::questions_array(payload)?;
        logs.push(format!("Recovered {} question records.", records.len()));

        let normalized = normalization_service::normalize_questions(&records, &request.topic);
        let Reconciliation {
            questions,
            warnings,
            synthesized,
            discarded,
        } = if request.uses_distribution() {
            reconciliation_service::reconcile(
                normalized,
                &request.distribution,
                &request.topic,
                request.subject.as_deref(),
            )
        } else {
            reconciliation_service::reconcile_count(
                normalized,
                request.count,
                request.question_type,
                request.difficulty,
                &request.topic,
                request.subject.as_deref(),
            )
        };

        logs.push(format!(
            "Finalized {} questions ({} synthesized, {} discarded).",
            questions.len(),
            synthesized,
            discarded
        ));
        logs.extend(warnings.iter().map(|w| format!("Warning: {}", w)));

        tracing::info!(
            topic = %request.topic,
            requested,
            returned = questions.len(),
            synthesized,
            discarded,
            warnings = warnings.len(),
            "question generation finished"
        );

        Ok(GenerationOutput {
            generation_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            questions,
            warnings,
            logs,
        })
    }

    /// Single-shot answer for one question; the model text is returned as-is.
    pub async fn solve(
        &self,
        question_text: &str,
        subject: Option<&str>,
        model: Option<&str>,
    ) -> Result<String> {
        if question_text.trim().is_empty() {
            return Err(Error::BadRequest("Question text cannot be empty".to_string()));
        }

        let completion = CompletionRequest {
            messages: vec![
                ChatMessage::system("You are a patient subject expert who writes model answers."),
                ChatMessage::user(prompt_service::build_solve_prompt(question_text, subject)),
            ],
            model: self.model_for(model),
            temperature: SOLVE_TEMPERATURE,
            max_tokens: self.max_tokens,
            top_p: TOP_P,
        };
        let answer = self.complete(completion).await?;
        Ok(answer.trim().to_string())
    }

    fn model_for(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model)
            .to_string()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.client.complete(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "completion timed out");
                Err(Error::Timeout(self.timeout.as_secs()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::DistributionEntry;
    use crate::models::question::{Difficulty, QuestionType};
    use crate::services::completion_client::MockCompletionClient;
    use async_trait::async_trait;

    fn service(mock: MockCompletionClient) -> AIService {
        AIService::new(
            Arc::new(mock),
            "test-model".to_string(),
            2048,
            Duration::from_secs(5),
        )
    }

    fn thermodynamics_request() -> GenerationRequest {
        let mut request = GenerationRequest::new("Thermodynamics");
        request.subject = Some("Physics".into());
        request.distribution = vec![
            DistributionEntry {
                question_type: QuestionType::Mcq,
                difficulty: Difficulty::Easy,
                count: 3,
                marks: Some(2),
            },
            DistributionEntry {
                question_type: QuestionType::Long,
                difficulty: Difficulty::Hard,
                count: 1,
                marks: Some(10),
            },
        ];
        request
    }

    const TWO_MCQS: &str = r#"```json
{"questions": [
  {"text": "Which quantity stays constant in an isothermal process?", "type": "mcq", "difficulty": "easy", "marks": 1,
   "options": ["Pressure", "Volume", "Entropy", "Temperature"], "correctAnswer": "Temperature"},
  {"text": "What is the SI unit of heat?", "type": "mcq", "difficulty": "easy",
   "options": ["Watt", "Kelvin", "Newton", "Joule"], "correctAnswer": "Joule"}
]}
```"#;

    #[tokio::test]
    async fn generate_fills_missing_buckets() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| {
                req.model == "test-model"
                    && req.messages.len() == 2
                    && req.messages[1].content.contains("REQUIRED DISTRIBUTION")
            })
            .times(1)
            .returning(|_| Ok(TWO_MCQS.to_string()));

        let output = service(mock).generate(&thermodynamics_request()).await.unwrap();

        let buckets: Vec<(QuestionType, Difficulty, u32)> = output
            .questions
            .iter()
            .map(|q| (q.question_type, q.difficulty, q.marks))
            .collect();
        assert_eq!(
            buckets,
            vec![
                (QuestionType::Mcq, Difficulty::Easy, 2),
                (QuestionType::Mcq, Difficulty::Easy, 2),
                (QuestionType::Mcq, Difficulty::Easy, 2),
                (QuestionType::Long, Difficulty::Hard, 10),
            ]
        );
        assert_eq!(
            output.questions[0].text,
            "Which quantity stays constant in an isothermal process?"
        );
        assert_eq!(output.questions[2].subject.as_deref(), Some("Physics"));
        assert!(output.warnings.is_empty());
        assert!(output.logs.iter().any(|l| l.contains("2 synthesized")));
    }

    #[tokio::test]
    async fn request_model_overrides_default() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| req.model == "gpt-4o")
            .returning(|_| Ok(r#"{"questions": []}"#.to_string()));

        let mut request = GenerationRequest::new("Cells");
        request.count = 2;
        request.model = Some("gpt-4o".into());
        let output = service(mock).generate(&request).await.unwrap();
        assert_eq!(output.questions.len(), 2);
    }

    #[tokio::test]
    async fn unparseable_response_is_an_extraction_error() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(|_| Ok("Sorry, I can't produce that right now.".to_string()));

        let err = service(mock)
            .generate(&thermodynamics_request())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn response_without_questions_is_a_schema_error() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(|_| Ok(r#"{"paper": "Thermodynamics"}"#.to_string()));

        let err = service(mock)
            .generate(&thermodynamics_request())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[tokio::test]
    async fn upstream_failure_propagates_without_retry() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(Error::Upstream("API error 500".to_string())));

        let err = service(mock)
            .generate(&thermodynamics_request())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    struct StalledClient;

    #[async_trait]
    impl CompletionClient for StalledClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn slow_completion_times_out() {
        let svc = AIService::new(
            Arc::new(StalledClient),
            "test-model".to_string(),
            256,
            Duration::from_millis(50),
        );
        let err = svc.solve("What is 2 + 2?", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn solve_returns_model_text() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| req.messages[1].content.contains("Question: Define power."))
            .returning(|_| Ok("  Power is the rate of doing work.\n".to_string()));

        let answer = service(mock)
            .solve("Define power.", Some("Physics"), None)
            .await
            .unwrap();
        assert_eq!(answer, "Power is the rate of doing work.");
    }

    #[tokio::test]
    async fn solve_rejects_blank_question() {
        let mock = MockCompletionClient::new();
        let err = service(mock).solve("   ", None, None).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
