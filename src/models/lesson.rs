//! Lesson model.

use serde::{Deserialize, Serialize};

use super::Belt;

/// A trainer-authored lesson video for one belt tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub belt: Belt,
    pub title: String,
    /// Externally hosted video link. Not validated.
    pub video_url: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for creating a lesson.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    #[serde(default)]
    pub belt: Belt,
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub description: String,
}

/// Query string for listing lessons by belt.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BeltQuery {
    #[serde(default)]
    pub belt: Option<Belt>,
}
