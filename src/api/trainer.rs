//! Trainer endpoints. Everything except the login check sits behind the PIN layer.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{success, ApiResult};
use crate::auth;
use crate::errors::AppError;
use crate::models::{
    BeltQuery, CreateLessonRequest, GradeRequest, ImportQuestionsRequest, Lesson,
    PracticeSubmission, Question, StudentProfile, TrainerLoginRequest,
};
use crate::AppState;

/// POST /api/trainer/login - Check the trainer PIN.
pub async fn trainer_login(
    State(state): State<AppState>,
    Json(request): Json<TrainerLoginRequest>,
) -> ApiResult<()> {
    auth::verify_trainer_pin(&request.pin, &state.config.trainer_pin)?;
    success(())
}

/// GET /api/trainer/lessons?belt= - Lessons for one belt (White by default).
pub async fn list_lessons(
    State(state): State<AppState>,
    Query(query): Query<BeltQuery>,
) -> ApiResult<Vec<Lesson>> {
    let belt = query.belt.unwrap_or_default();
    let db = state.repo.load().await?;
    success(db.lessons.into_iter().filter(|l| l.belt == belt).collect())
}

/// POST /api/trainer/lessons - Create a lesson.
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(request): Json<CreateLessonRequest>,
) -> ApiResult<Lesson> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Lesson title is required".to_string()));
    }
    if request.video_url.trim().is_empty() {
        return Err(AppError::Validation("Video link is required".to_string()));
    }

    let lesson = Lesson {
        id: uuid::Uuid::new_v4().to_string(),
        belt: request.belt,
        title: request.title,
        video_url: request.video_url,
        description: request.description,
    };
    state.repo.add_lesson(lesson.clone()).await?;
    success(lesson)
}

/// DELETE /api/trainer/lessons/{id} - Delete a lesson.
pub async fn delete_lesson(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_lesson(&id).await?;
    success(())
}

/// GET /api/trainer/submissions - Every submission for review.
pub async fn list_submissions(State(state): State<AppState>) -> ApiResult<Vec<PracticeSubmission>> {
    let db = state.repo.load().await?;
    // Newest first
    success(db.submissions.into_iter().rev().collect())
}

/// PUT /api/trainer/submissions/{id}/grade - Approve with a score and feedback.
pub async fn grade_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<GradeRequest>,
) -> ApiResult<PracticeSubmission> {
    if !(1..=10).contains(&request.score) {
        return Err(AppError::Validation(
            "Score must be between 1 and 10".to_string(),
        ));
    }

    let graded = state
        .repo
        .grade_submission(&id, request.score, &request.feedback)
        .await?;
    success(graded)
}

/// GET /api/trainer/students - The student roster.
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Vec<StudentProfile>> {
    let db = state.repo.load().await?;
    success(db.students.iter().map(StudentProfile::from).collect())
}

/// GET /api/trainer/questions - The whole question bank.
pub async fn list_questions(State(state): State<AppState>) -> ApiResult<Vec<Question>> {
    let db = state.repo.load().await?;
    success(db.questions)
}

/// POST /api/trainer/questions - Import a batch of questions.
pub async fn import_questions(
    State(state): State<AppState>,
    Json(request): Json<ImportQuestionsRequest>,
) -> ApiResult<Vec<Question>> {
    let mut questions = Vec::with_capacity(request.questions.len());

    for (idx, new) in request.questions.into_iter().enumerate() {
        if new.text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Question {} has no text",
                idx + 1
            )));
        }
        if new.options.len() < 2 {
            return Err(AppError::Validation(format!(
                "Question {} needs at least two options",
                idx + 1
            )));
        }
        if new.correct_answer_index >= new.options.len() {
            return Err(AppError::Validation(format!(
                "Question {} has no option at index {}",
                idx + 1,
                new.correct_answer_index
            )));
        }

        questions.push(Question {
            id: new
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            belt: new.belt,
            text: new.text,
            options: new.options,
            correct_answer_index: new.correct_answer_index,
        });
    }

    state.repo.add_questions(questions.clone()).await?;
    success(questions)
}
