//! Student quiz endpoints.

use axum::{extract::State, Json};

use super::{require_student, success, ApiResult};
use crate::models::AnswerRequest;
use crate::quiz::QuizView;
use crate::AppState;

/// POST /api/me/quiz - Start a new attempt for the student's belt.
pub async fn start_quiz(State(state): State<AppState>) -> ApiResult<QuizView> {
    let student = require_student(&state).await?;
    success(state.quizzes.start(&student).await?)
}

/// GET /api/me/quiz - The active attempt.
pub async fn get_quiz(State(state): State<AppState>) -> ApiResult<QuizView> {
    let student = require_student(&state).await?;
    success(state.quizzes.current(&student).await?)
}

/// POST /api/me/quiz/answer - Answer the current question and advance.
pub async fn answer_quiz(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> ApiResult<QuizView> {
    let student = require_student(&state).await?;
    success(state.quizzes.answer(&student, request.option).await?)
}
