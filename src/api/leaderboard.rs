//! Public leaderboards.

use axum::extract::State;

use super::{success, ApiResult};
use crate::scoring::{self, PracticeBoard, QuizStanding};
use crate::AppState;

/// GET /api/leaderboard/practice - Practice points and the Dojo Legend.
pub async fn practice_leaderboard(State(state): State<AppState>) -> ApiResult<PracticeBoard> {
    let db = state.repo.load().await?;
    success(scoring::practice_board(&db))
}

/// GET /api/leaderboard/quiz - Top quiz results.
pub async fn quiz_leaderboard(State(state): State<AppState>) -> ApiResult<Vec<QuizStanding>> {
    let db = state.repo.load().await?;
    success(scoring::quiz_board(&db))
}
