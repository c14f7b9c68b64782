use crate::{
    dto::generation_dto::{GenerateQuestionsPayload, OutlinePayload, SolvePayload, SolveResponse},
    error::Result,
    services::paper_service,
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let request = payload.into_request()?;

    let output = state.ai_service.generate(&request).await?;
    tracing::info!(
        generation_id = %output.generation_id,
        questions = output.questions.len(),
        warnings = output.warnings.len(),
        "generated questions"
    );
    Ok((StatusCode::OK, Json(output)))
}

#[axum::debug_handler]
pub async fn solve_question(
    State(state): State<AppState>,
    Json(payload): Json<SolvePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let answer = state
        .ai_service
        .solve(
            &payload.question_text,
            payload.subject.as_deref(),
            payload.model.as_deref(),
        )
        .await?;
    Ok(Json(SolveResponse { answer }))
}

#[axum::debug_handler]
pub async fn paper_outline(Json(payload): Json<OutlinePayload>) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outline = paper_service::build_outline(&payload.questions, &payload.metadata());
    Ok(Json(outline))
}
