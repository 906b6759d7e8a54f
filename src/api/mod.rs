//! REST API module.
//!
//! Handlers are grouped by audience: public, student (needs a session) and
//! trainer (behind the PIN layer).

mod academy;
mod leaderboard;
mod quiz;
mod students;
mod trainer;

pub use academy::*;
pub use leaderboard::*;
pub use quiz::*;
pub use students::*;
pub use trainer::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Student;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// The logged-in student, or `401` when no session exists.
pub async fn require_student(state: &AppState) -> Result<Student, AppError> {
    state
        .repo
        .load_session()
        .await?
        .ok_or_else(|| AppError::Unauthorized("Please log in as a student first.".to_string()))
}
