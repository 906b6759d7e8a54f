//! Belt quiz engine.
//!
//! An attempt moves `NotStarted -> InProgress -> Finished` and never goes back.
//! A belt with no questions leaves the attempt in `NotStarted` for good.

mod session;

pub use session::*;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{AnswerRecord, Belt, Question, QuizResult, Student};
use crate::scoring::is_mastery_award;

/// Questions drawn per attempt.
pub const QUIZ_QUESTION_COUNT: usize = 10;
/// Countdown length of an attempt.
pub const QUIZ_TIME_LIMIT_SECONDS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizPhase {
    NotStarted,
    InProgress,
    Finished,
}

/// Errors from driving an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    NotInProgress(QuizPhase),
    OptionOutOfRange { option: usize, available: usize },
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::NotInProgress(phase) => write!(f, "Quiz is not in progress ({:?})", phase),
            QuizError::OptionOutOfRange { option, available } => write!(
                f,
                "Option {} is out of range ({} options)",
                option, available
            ),
        }
    }
}

impl std::error::Error for QuizError {}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NotInProgress(_) => AppError::Conflict(err.to_string()),
            QuizError::OptionOutOfRange { .. } => AppError::Validation(err.to_string()),
        }
    }
}

/// Final numbers of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub score: u32,
    pub total_questions: u32,
    pub time_spent: u32,
    pub mastery_award: bool,
    pub answers: Vec<AnswerRecord>,
}

impl QuizOutcome {
    /// Build the persisted record for a student.
    pub fn into_result(self, id: String, student: &Student, timestamp: i64) -> QuizResult {
        QuizResult {
            id,
            student_name: student.username.clone(),
            belt: student.belt,
            score: self.score,
            total_questions: self.total_questions,
            time_spent: self.time_spent,
            timestamp,
            answers: self.answers,
        }
    }
}

/// One quiz attempt.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    belt: Belt,
    phase: QuizPhase,
    questions: Vec<Question>,
    selections: Vec<Option<usize>>,
    current: usize,
    remaining: u32,
}

impl QuizAttempt {
    /// Draw up to ten shuffled questions for `belt` from `pool`.
    pub fn start<R: Rng + ?Sized>(pool: &[Question], belt: Belt, rng: &mut R) -> Self {
        let mut questions: Vec<Question> =
            pool.iter().filter(|q| q.belt == belt).cloned().collect();

        let phase = if questions.is_empty() {
            QuizPhase::NotStarted
        } else {
            questions.shuffle(rng);
            questions.truncate(QUIZ_QUESTION_COUNT);
            QuizPhase::InProgress
        };

        Self {
            belt,
            phase,
            selections: vec![None; questions.len()],
            questions,
            current: 0,
            remaining: QUIZ_TIME_LIMIT_SECONDS,
        }
    }

    pub fn belt(&self) -> Belt {
        self.belt
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question awaiting an answer, while in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.current),
            _ => None,
        }
    }

    /// Record an answer for the current question and advance.
    pub fn select(&mut self, option: usize) -> Result<QuizPhase, QuizError> {
        let question = self
            .current_question()
            .ok_or(QuizError::NotInProgress(self.phase))?;

        if option >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                option,
                available: question.options.len(),
            });
        }

        self.selections[self.current] = Some(option);
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.phase = QuizPhase::Finished;
        }
        Ok(self.phase)
    }

    /// Advance the countdown by one second. Reaching zero finishes the attempt.
    pub fn tick(&mut self) -> QuizPhase {
        if self.phase == QuizPhase::InProgress {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.phase = QuizPhase::Finished;
            }
        }
        self.phase
    }

    pub fn time_spent(&self) -> u32 {
        QUIZ_TIME_LIMIT_SECONDS - self.remaining
    }

    /// Score the attempt. `None` until finished. Unanswered questions are wrong.
    pub fn outcome(&self) -> Option<QuizOutcome> {
        if self.phase != QuizPhase::Finished {
            return None;
        }

        let answers: Vec<AnswerRecord> = self
            .questions
            .iter()
            .zip(&self.selections)
            .map(|(question, selected)| AnswerRecord {
                question_id: question.id.clone(),
                selected_option: *selected,
                is_correct: *selected == Some(question.correct_answer_index),
            })
            .collect();

        let score = answers.iter().filter(|a| a.is_correct).count() as u32;
        let time_spent = self.time_spent();

        Some(QuizOutcome {
            score,
            total_questions: self.questions.len() as u32,
            time_spent,
            mastery_award: is_mastery_award(score, time_spent),
            answers,
        })
    }
}
