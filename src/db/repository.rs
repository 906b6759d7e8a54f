//! Document repository.
//!
//! Every mutation is a read-modify-write of the whole application document.
//! There is no transaction and no version check between the read and the write.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{DocumentStore, SESSION_KEY, STORAGE_KEY};
use crate::errors::AppError;
use crate::models::{
    Datastore, Lesson, PracticeSubmission, Question, QuizResult, Student, SubmissionStatus,
};

/// Repository over the application and session documents.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Load the application document.
    ///
    /// Missing or malformed data falls back to the empty document; only a
    /// failing store is reported.
    pub async fn load(&self) -> Result<Datastore, AppError> {
        match self.store.get(STORAGE_KEY).await? {
            Some(raw) => Ok(hydrate(&raw)),
            None => Ok(Datastore::default()),
        }
    }

    /// Overwrite the application document.
    pub async fn save(&self, state: &Datastore) -> Result<(), AppError> {
        let raw = serde_json::to_string(state)?;
        self.store.put(STORAGE_KEY, &raw).await
    }

    /// Load the logged-in student snapshot, if any.
    pub async fn load_session(&self) -> Result<Option<Student>, AppError> {
        let Some(raw) = self.store.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(student) => Ok(Some(student)),
            Err(e) => {
                tracing::warn!("Discarding malformed session document: {}", e);
                Ok(None)
            }
        }
    }

    /// Store the session snapshot, or clear it with `None`.
    pub async fn save_session(&self, student: Option<&Student>) -> Result<(), AppError> {
        match student {
            Some(student) => {
                let raw = serde_json::to_string(student)?;
                self.store.put(SESSION_KEY, &raw).await
            }
            None => self.store.remove(SESSION_KEY).await,
        }
    }

    // ==================== LESSON OPERATIONS ====================

    pub async fn add_lesson(&self, lesson: Lesson) -> Result<(), AppError> {
        let mut db = self.load().await?;
        tracing::info!("Adding lesson {} for {} belt", lesson.id, lesson.belt.as_str());
        db.lessons.push(lesson);
        self.save(&db).await
    }

    /// Delete a lesson. Submissions that reference it are kept.
    pub async fn delete_lesson(&self, id: &str) -> Result<(), AppError> {
        let mut db = self.load().await?;
        let before = db.lessons.len();
        db.lessons.retain(|l| l.id != id);

        if db.lessons.len() == before {
            return Err(AppError::NotFound(format!("Lesson {} not found", id)));
        }

        tracing::info!("Deleted lesson {}", id);
        self.save(&db).await
    }

    // ==================== SUBMISSION OPERATIONS ====================

    pub async fn add_submission(&self, submission: PracticeSubmission) -> Result<(), AppError> {
        let mut db = self.load().await?;
        tracing::info!(
            "Student {} submitted practice for lesson {}",
            submission.student_id,
            submission.lesson_id
        );
        db.submissions.push(submission);
        self.save(&db).await
    }

    /// Approve a submission with a score and feedback. Re-grading overwrites.
    pub async fn grade_submission(
        &self,
        id: &str,
        score: u8,
        feedback: &str,
    ) -> Result<PracticeSubmission, AppError> {
        let mut db = self.load().await?;
        let submission = db
            .submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", id)))?;

        submission.status = SubmissionStatus::Approved;
        submission.score = Some(score);
        submission.feedback = Some(feedback.to_string());
        let graded = submission.clone();

        self.save(&db).await?;
        tracing::info!("Graded submission {} with {}/10", id, score);
        Ok(graded)
    }

    // ==================== QUIZ OPERATIONS ====================

    pub async fn add_questions(&self, questions: Vec<Question>) -> Result<(), AppError> {
        let mut db = self.load().await?;
        tracing::info!("Importing {} questions", questions.len());
        db.questions.extend(questions);
        self.save(&db).await
    }

    pub async fn add_result(&self, result: QuizResult) -> Result<(), AppError> {
        let mut db = self.load().await?;
        tracing::info!(
            "Recording quiz result for {}: {}/{} in {}s",
            result.student_name,
            result.score,
            result.total_questions,
            result.time_spent
        );
        db.results.push(result);
        self.save(&db).await
    }

    /// Append an achievement to a student unless they already hold it.
    ///
    /// Returns the updated student, or `None` when the id is unknown.
    pub async fn award_achievement(
        &self,
        student_id: &str,
        achievement: &str,
    ) -> Result<Option<Student>, AppError> {
        let mut db = self.load().await?;
        let Some(student) = db.students.iter_mut().find(|s| s.id == student_id) else {
            return Ok(None);
        };

        if student.has_achievement(achievement) {
            return Ok(Some(student.clone()));
        }

        student.achievements.push(achievement.to_string());
        let updated = student.clone();
        self.save(&db).await?;
        tracing::info!("Student {} earned {}", student_id, achievement);
        Ok(Some(updated))
    }
}

/// Parse a stored application document, recovering per collection.
fn hydrate(raw: &str) -> Datastore {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            tracing::warn!("Stored document is not an object, starting from empty state");
            return Datastore::default();
        }
        Err(e) => {
            tracing::warn!("Stored document is malformed, starting from empty state: {}", e);
            return Datastore::default();
        }
    };

    Datastore {
        students: collection(&value, "students"),
        lessons: collection(&value, "lessons"),
        submissions: collection(&value, "submissions"),
        questions: collection(&value, "questions"),
        results: collection(&value, "results"),
    }
}

fn collection<T: DeserializeOwned>(doc: &Value, field: &str) -> Vec<T> {
    match doc.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Skipping unreadable '{}' entry {}: {}", field, index, e);
                    None
                }
            })
            .collect(),
        Some(_) => {
            tracing::warn!("'{}' is not a list, treating as empty", field);
            Vec::new()
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use crate::models::{AnswerRecord, Belt};

    fn repo() -> (Repository, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        (Repository::new(store.clone()), store)
    }

    fn populated() -> Datastore {
        Datastore {
            students: vec![Student {
                id: "student_1_abcde".to_string(),
                username: "ryu".to_string(),
                display_name: "Ryu".to_string(),
                password: "hadoken".to_string(),
                belt: Belt::Green,
                achievements: vec!["Nunchucks".to_string()],
            }],
            lessons: vec![Lesson {
                id: "l1".to_string(),
                belt: Belt::Green,
                title: "Heian Sandan".to_string(),
                video_url: "https://video.example/heian-sandan".to_string(),
                description: "Third kata".to_string(),
            }],
            submissions: vec![PracticeSubmission {
                id: "s1".to_string(),
                student_id: "student_1_abcde".to_string(),
                student_name: "ryu".to_string(),
                lesson_id: "l1".to_string(),
                lesson_title: "Heian Sandan".to_string(),
                video_blob_url: "blob:local/1".to_string(),
                timestamp: 1_700_000_000_000,
                status: SubmissionStatus::Approved,
                score: Some(8),
                feedback: Some("Deeper stance".to_string()),
            }],
            questions: vec![Question {
                id: "q1".to_string(),
                belt: Belt::Green,
                text: "How many moves in Heian Sandan?".to_string(),
                options: vec!["20".to_string(), "23".to_string()],
                correct_answer_index: 0,
            }],
            results: vec![QuizResult {
                id: "r1".to_string(),
                student_name: "ryu".to_string(),
                belt: Belt::Green,
                score: 1,
                total_questions: 1,
                time_spent: 42,
                timestamp: 1_700_000_000_500,
                answers: vec![AnswerRecord {
                    question_id: "q1".to_string(),
                    selected_option: Some(0),
                    is_correct: true,
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_load_after_save_returns_same_document() {
        let (repo, _) = repo();
        let state = populated();

        repo.save(&state).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_load_missing_document_is_empty() {
        let (repo, _) = repo();
        assert_eq!(repo.load().await.unwrap(), Datastore::default());
    }

    #[tokio::test]
    async fn test_load_malformed_document_is_empty() {
        let (repo, store) = repo();
        store.put(STORAGE_KEY, "{not json").await.unwrap();

        let db = repo.load().await.unwrap();
        assert!(db.students.is_empty());
        assert!(db.lessons.is_empty());
        assert!(db.submissions.is_empty());
        assert!(db.questions.is_empty());
        assert!(db.results.is_empty());
    }

    #[tokio::test]
    async fn test_load_recovers_per_collection() {
        let (repo, store) = repo();
        let mut doc = serde_json::to_value(populated()).unwrap();
        doc["lessons"] = serde_json::json!("oops");
        doc.as_object_mut().unwrap().remove("results");
        store.put(STORAGE_KEY, &doc.to_string()).await.unwrap();

        let db = repo.load().await.unwrap();
        assert_eq!(db.students.len(), 1);
        assert!(db.lessons.is_empty());
        assert_eq!(db.submissions.len(), 1);
        assert!(db.results.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_entry_does_not_drop_its_collection() {
        let (repo, store) = repo();
        let mut doc = serde_json::to_value(populated()).unwrap();
        let mut broken = doc["submissions"][0].clone();
        broken["id"] = serde_json::json!("s2");
        broken["timestamp"] = serde_json::json!(1.5);
        doc["submissions"].as_array_mut().unwrap().push(broken);
        store.put(STORAGE_KEY, &doc.to_string()).await.unwrap();

        let db = repo.load().await.unwrap();
        assert_eq!(db.submissions, populated().submissions);

        // An unrelated write keeps the readable submission.
        repo.add_lesson(Lesson {
            id: "l2".to_string(),
            belt: Belt::Green,
            title: "Heian Yondan".to_string(),
            video_url: "https://video.example/heian-yondan".to_string(),
            description: "Fourth kata".to_string(),
        })
        .await
        .unwrap();

        let db = repo.load().await.unwrap();
        assert_eq!(db.lessons.len(), 2);
        assert_eq!(db.submissions.len(), 1);
        assert_eq!(db.submissions[0].status, SubmissionStatus::Approved);
    }

    #[tokio::test]
    async fn test_session_roundtrip_and_clear() {
        let (repo, store) = repo();
        let student = populated().students.remove(0);

        repo.save_session(Some(&student)).await.unwrap();
        assert_eq!(repo.load_session().await.unwrap(), Some(student));

        repo.save_session(None).await.unwrap();
        assert_eq!(repo.load_session().await.unwrap(), None);

        store.put(SESSION_KEY, "garbage").await.unwrap();
        assert_eq!(repo.load_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_grading_twice_keeps_latest() {
        let (repo, _) = repo();
        let mut state = populated();
        state.submissions[0].status = SubmissionStatus::Pending;
        state.submissions[0].score = None;
        state.submissions[0].feedback = None;
        repo.save(&state).await.unwrap();

        repo.grade_submission("s1", 4, "Faster").await.unwrap();
        repo.grade_submission("s1", 9, "Sharp kime").await.unwrap();

        let db = repo.load().await.unwrap();
        assert_eq!(db.submissions.len(), 1);
        assert_eq!(db.submissions[0].status, SubmissionStatus::Approved);
        assert_eq!(db.submissions[0].score, Some(9));
        assert_eq!(db.submissions[0].feedback.as_deref(), Some("Sharp kime"));
    }

    #[tokio::test]
    async fn test_grading_unknown_submission() {
        let (repo, _) = repo();
        let err = repo.grade_submission("missing", 5, "").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_lesson_keeps_orphaned_submissions() {
        let (repo, _) = repo();
        repo.save(&populated()).await.unwrap();

        repo.delete_lesson("l1").await.unwrap();

        let db = repo.load().await.unwrap();
        assert!(db.lessons.is_empty());
        assert_eq!(db.submissions.len(), 1);
        assert_eq!(db.submissions[0].lesson_title, "Heian Sandan");

        let err = repo.delete_lesson("l1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_award_achievement_is_deduplicated() {
        let (repo, _) = repo();
        let mut state = populated();
        state.students[0].achievements.clear();
        repo.save(&state).await.unwrap();

        repo.award_achievement("student_1_abcde", "Nunchucks")
            .await
            .unwrap();
        let updated = repo
            .award_achievement("student_1_abcde", "Nunchucks")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.achievements, vec!["Nunchucks".to_string()]);
        assert!(repo
            .award_achievement("nobody", "Nunchucks")
            .await
            .unwrap()
            .is_none());
    }
}
