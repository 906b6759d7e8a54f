//! The root application document.

use serde::{Deserialize, Serialize};

use super::{Lesson, PracticeSubmission, Question, QuizResult, Student};

/// Everything the portal persists, stored and overwritten as one document.
///
/// Collections are scanned linearly; nothing enforces that submissions point
/// at live students or lessons.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Datastore {
    pub students: Vec<Student>,
    pub lessons: Vec<Lesson>,
    pub submissions: Vec<PracticeSubmission>,
    pub questions: Vec<Question>,
    pub results: Vec<QuizResult>,
}

impl Datastore {
    pub fn find_student_by_username(&self, username: &str) -> Option<&Student> {
        let normalized = username.trim().to_lowercase();
        self.students
            .iter()
            .find(|s| s.username.to_lowercase() == normalized)
    }

    pub fn find_lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }
}
