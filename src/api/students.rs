//! Student identity and practice endpoints.

use axum::{extract::State, Json};
use chrono::Utc;

use super::{require_student, success, ApiResult};
use crate::auth;
use crate::capture::ClipRef;
use crate::errors::AppError;
use crate::models::{
    CreateSubmissionRequest, Lesson, LoginRequest, PracticeSubmission, RegisterRequest,
    StudentProfile, SubmissionStatus,
};
use crate::AppState;

/// POST /api/students/register - Register and log in.
pub async fn register_student(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<StudentProfile> {
    let student = auth::register(&state.repo, &request).await?;
    state.repo.save_session(Some(&student)).await?;
    success(StudentProfile::from(&student))
}

/// POST /api/session/login - Log in an existing student.
pub async fn login_student(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<StudentProfile> {
    let student = auth::login(&state.repo, &request).await?;
    state.repo.save_session(Some(&student)).await?;
    tracing::info!("Student {} logged in", student.username);
    success(StudentProfile::from(&student))
}

/// POST /api/session/logout - Clear the session.
pub async fn logout_student(State(state): State<AppState>) -> ApiResult<()> {
    state.repo.save_session(None).await?;
    success(())
}

/// GET /api/session - The logged-in student, if any.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<Option<StudentProfile>> {
    let session = state.repo.load_session().await?;
    success(session.as_ref().map(StudentProfile::from))
}

/// GET /api/me/lessons - Lessons for the student's belt.
pub async fn my_lessons(State(state): State<AppState>) -> ApiResult<Vec<Lesson>> {
    let student = require_student(&state).await?;
    let db = state.repo.load().await?;

    let lessons = db
        .lessons
        .into_iter()
        .filter(|l| l.belt == student.belt)
        .collect();
    success(lessons)
}

/// GET /api/me/submissions - The student's own submissions.
pub async fn my_submissions(State(state): State<AppState>) -> ApiResult<Vec<PracticeSubmission>> {
    let student = require_student(&state).await?;
    let db = state.repo.load().await?;

    let submissions = db
        .submissions
        .into_iter()
        .filter(|s| s.student_id == student.id)
        .collect();
    success(submissions)
}

/// POST /api/me/submissions - Submit a recorded practice clip.
pub async fn submit_practice(
    State(state): State<AppState>,
    Json(request): Json<CreateSubmissionRequest>,
) -> ApiResult<PracticeSubmission> {
    let student = require_student(&state).await?;
    let clip = ClipRef::new(request.video_blob_url)?;

    let db = state.repo.load().await?;
    let lesson = db
        .find_lesson(&request.lesson_id)
        .ok_or_else(|| AppError::NotFound(format!("Lesson {} not found", request.lesson_id)))?;

    let submission = PracticeSubmission {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: student.id.clone(),
        student_name: student.username.clone(),
        lesson_id: lesson.id.clone(),
        lesson_title: lesson.title.clone(),
        video_blob_url: clip.into_string(),
        timestamp: Utc::now().timestamp_millis(),
        status: SubmissionStatus::Pending,
        score: None,
        feedback: None,
    };

    state.repo.add_submission(submission.clone()).await?;
    success(submission)
}
