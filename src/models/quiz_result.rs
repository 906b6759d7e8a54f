//! Completed quiz attempt model.

use serde::{Deserialize, Serialize};

use super::Belt;

/// One answer slot of a completed attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    /// Absent when the question was never answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<usize>,
    pub is_correct: bool,
}

/// A finished quiz attempt. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    /// Username of the student at the time of the attempt.
    pub student_name: String,
    pub belt: Belt,
    pub score: u32,
    pub total_questions: u32,
    /// Seconds.
    pub time_spent: u32,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub answers: Vec<AnswerRecord>,
}

/// Request body for answering the current quiz question.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub option: usize,
}
