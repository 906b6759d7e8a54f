//! Practice submission model.

use serde::{Deserialize, Serialize};

/// Trainer evaluation state of a practice clip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    #[serde(rename = "Try Again")]
    TryAgain,
}

/// A recorded practice clip for a lesson.
///
/// `student_name` and `lesson_title` are snapshots taken at creation time so the
/// submission still renders after the lesson or student is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSubmission {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub lesson_id: String,
    pub lesson_title: String,
    /// Session-local clip reference; does not survive a restart of the client.
    pub video_blob_url: String,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Request body for a student submitting a recorded clip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub lesson_id: String,
    pub video_blob_url: String,
}

/// Request body for grading a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeRequest {
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
}
