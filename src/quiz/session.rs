//! The active quiz attempt and its countdown.
//!
//! The portal serves one profile, so at most one attempt is active. Starting a
//! new attempt replaces the old one and cancels its countdown.

use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{QuizAttempt, QuizOutcome, QuizPhase};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Belt, Student};
use crate::scoring::MASTERY_AWARD;

/// A question as shown to the student, without its answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
}

/// Snapshot of the active attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub attempt_id: String,
    pub phase: QuizPhase,
    pub belt: Belt,
    pub question_index: usize,
    pub total_questions: usize,
    pub remaining_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<QuizOutcome>,
}

struct ActiveQuiz {
    id: String,
    result_id: String,
    student: Student,
    attempt: QuizAttempt,
    recorded: bool,
    countdown: Option<JoinHandle<()>>,
}

impl ActiveQuiz {
    fn view(&self) -> QuizView {
        QuizView {
            attempt_id: self.id.clone(),
            phase: self.attempt.phase(),
            belt: self.attempt.belt(),
            question_index: self.attempt.current_index(),
            total_questions: self.attempt.questions().len(),
            remaining_seconds: self.attempt.remaining(),
            question: self.attempt.current_question().map(|q| QuestionView {
                id: q.id.clone(),
                text: q.text.clone(),
                options: q.options.clone(),
            }),
            outcome: self.attempt.outcome(),
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }
}

impl Drop for ActiveQuiz {
    fn drop(&mut self) {
        self.stop_countdown();
    }
}

/// Owns the active attempt, drives its countdown and records the result.
pub struct QuizSessions {
    repo: Arc<Repository>,
    tick: Duration,
    rng: StdMutex<StdRng>,
    active: Mutex<Option<ActiveQuiz>>,
}

impl QuizSessions {
    /// `tick` is the wall-clock length of one countdown second.
    pub fn new(repo: Arc<Repository>, tick: Duration, rng: StdRng) -> Self {
        Self {
            repo,
            tick,
            rng: StdMutex::new(rng),
            active: Mutex::new(None),
        }
    }

    /// Start a fresh attempt for `student`, replacing any active one.
    pub async fn start(self: &Arc<Self>, student: &Student) -> Result<QuizView, AppError> {
        let db = self.repo.load().await?;
        let attempt = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| AppError::Internal("Quiz random source poisoned".to_string()))?;
            QuizAttempt::start(&db.questions, student.belt, &mut *rng)
        };

        let mut active = ActiveQuiz {
            id: uuid::Uuid::new_v4().to_string(),
            result_id: uuid::Uuid::new_v4().to_string(),
            student: student.clone(),
            attempt,
            recorded: false,
            countdown: None,
        };

        // Hold the slot before spawning so the first tick sees this attempt.
        let mut slot = self.active.lock().await;

        match active.attempt.phase() {
            QuizPhase::InProgress => {
                active.countdown = Some(self.spawn_countdown(active.id.clone()));
                tracing::info!(
                    "Quiz {} started for {} with {} questions",
                    active.id,
                    student.username,
                    active.attempt.questions().len()
                );
            }
            _ => tracing::info!(
                "No {} belt questions available for {}",
                student.belt.as_str(),
                student.username
            ),
        }

        let view = active.view();
        // Dropping the previous attempt cancels its countdown.
        *slot = Some(active);
        Ok(view)
    }

    /// The active attempt of `student`.
    ///
    /// A finished attempt whose result could not be saved is saved again here.
    pub async fn current(&self, student: &Student) -> Result<QuizView, AppError> {
        let mut guard = self.active.lock().await;
        let active = match guard.as_mut() {
            Some(active) if active.student.id == student.id => active,
            _ => return Err(AppError::NotFound("No quiz in progress".to_string())),
        };

        self.record(active).await?;
        Ok(active.view())
    }

    /// Answer the current question of `student`'s attempt.
    pub async fn answer(&self, student: &Student, option: usize) -> Result<QuizView, AppError> {
        let mut guard = self.active.lock().await;
        let active = match guard.as_mut() {
            Some(active) if active.student.id == student.id => active,
            _ => return Err(AppError::NotFound("No quiz in progress".to_string())),
        };

        if active.attempt.phase() == QuizPhase::Finished && !active.recorded {
            self.record(active).await?;
            return Ok(active.view());
        }

        if active.attempt.select(option)? == QuizPhase::Finished {
            active.stop_countdown();
            self.record(active).await?;
        }
        Ok(active.view())
    }

    fn spawn_countdown(self: &Arc<Self>, attempt_id: String) -> JoinHandle<()> {
        let sessions: Weak<Self> = Arc::downgrade(self);
        let period = self.tick;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(sessions) = sessions.upgrade() else {
                    break;
                };
                match sessions.tick_active(&attempt_id).await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => {
                        tracing::warn!("Quiz {} countdown stopped: {}", attempt_id, e);
                        break;
                    }
                }
            }
        })
    }

    /// Tick the attempt with `attempt_id`; returns whether the countdown should go on.
    async fn tick_active(&self, attempt_id: &str) -> Result<bool, AppError> {
        let mut guard = self.active.lock().await;
        let Some(active) = guard.as_mut().filter(|a| a.id == attempt_id) else {
            return Ok(false);
        };

        match active.attempt.tick() {
            QuizPhase::InProgress => Ok(true),
            _ => {
                tracing::info!("Quiz {} ran out of time", attempt_id);
                // The countdown task is the caller; let it end on its own.
                active.countdown = None;
                self.record(active).await?;
                Ok(false)
            }
        }
    }

    /// Persist the result of a finished attempt exactly once.
    ///
    /// On a failed write the attempt stays unrecorded so a later call retries it.
    async fn record(&self, active: &mut ActiveQuiz) -> Result<(), AppError> {
        if active.recorded {
            return Ok(());
        }
        let Some(outcome) = active.attempt.outcome() else {
            return Ok(());
        };

        let mastery = outcome.mastery_award;
        let result = outcome.into_result(
            active.result_id.clone(),
            &active.student,
            Utc::now().timestamp_millis(),
        );
        if let Err(e) = self.repo.add_result(result).await {
            tracing::warn!("Quiz {} result not saved yet: {}", active.id, e);
            return Err(e);
        }
        active.recorded = true;

        if mastery {
            self.grant_mastery(&active.student).await?;
        }
        Ok(())
    }

    async fn grant_mastery(&self, student: &Student) -> Result<(), AppError> {
        let Some(updated) = self
            .repo
            .award_achievement(&student.id, MASTERY_AWARD)
            .await?
        else {
            return Ok(());
        };

        let session = self.repo.load_session().await?;
        if session.is_some_and(|s| s.id == updated.id) {
            self.repo.save_session(Some(&updated)).await?;
        }
        Ok(())
    }
}
