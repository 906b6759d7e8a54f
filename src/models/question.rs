//! Quiz question model.

use serde::{Deserialize, Serialize};

use super::Belt;

/// A multiple-choice question for one belt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub belt: Belt,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// Request body for importing a batch of questions.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportQuestionsRequest {
    pub questions: Vec<NewQuestion>,
}

/// A question as supplied for import; the id is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[serde(default)]
    pub id: Option<String>,
    pub belt: Belt,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}
