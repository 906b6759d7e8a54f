//! Leaderboards and the mastery award.
//!
//! Pure functions over a loaded [`Datastore`]; nothing here writes.

use serde::Serialize;

use crate::models::{Belt, Datastore, QuizResult};

/// Minimum quiz score for the mastery award.
pub const MASTERY_MIN_SCORE: u32 = 9;
/// The award needs a finish strictly under this many seconds.
pub const MASTERY_MAX_SECONDS: u32 = 180;
/// Achievement name recorded for the mastery award.
pub const MASTERY_AWARD: &str = "Nunchucks";

/// Entries shown on the practice scoreboard.
pub const PRACTICE_BOARD_SIZE: usize = 10;
/// Entries shown on the quiz leaderboard.
pub const QUIZ_BOARD_SIZE: usize = 50;

/// One student's practice total.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStanding {
    pub student_id: String,
    pub display_name: String,
    pub belt: Belt,
    pub total_points: u32,
}

/// The practice scoreboard with its top entry.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeBoard {
    /// The current Dojo Legend.
    pub legend: Option<PracticeStanding>,
    pub entries: Vec<PracticeStanding>,
}

/// A quiz leaderboard row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStanding {
    pub rank: usize,
    #[serde(flatten)]
    pub result: QuizResult,
    pub percent: u32,
    pub has_mastery_award: bool,
}

/// Rank students by the sum of their graded submission scores.
///
/// Students with no points are left out. Ties keep student order.
pub fn practice_leaderboard(db: &Datastore) -> Vec<PracticeStanding> {
    let mut standings: Vec<PracticeStanding> = db
        .students
        .iter()
        .map(|student| PracticeStanding {
            student_id: student.id.clone(),
            display_name: student.display_name.clone(),
            belt: student.belt,
            total_points: db
                .submissions
                .iter()
                .filter(|s| s.student_id == student.id)
                .filter_map(|s| s.score)
                .map(u32::from)
                .sum(),
        })
        .filter(|standing| standing.total_points > 0)
        .collect();

    // sort_by is stable, so equal totals stay in student order
    standings.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    standings
}

/// The scoreboard as displayed: top entries plus the legend.
pub fn practice_board(db: &Datastore) -> PracticeBoard {
    let mut entries = practice_leaderboard(db);
    entries.truncate(PRACTICE_BOARD_SIZE);
    PracticeBoard {
        legend: entries.first().cloned(),
        entries,
    }
}

/// Order quiz results by score, then by faster time, and keep the top 50.
pub fn quiz_leaderboard(results: &[QuizResult]) -> Vec<QuizResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.time_spent.cmp(&b.time_spent))
    });
    sorted.truncate(QUIZ_BOARD_SIZE);
    sorted
}

/// The quiz leaderboard with award markers from the student list.
pub fn quiz_board(db: &Datastore) -> Vec<QuizStanding> {
    quiz_leaderboard(&db.results)
        .into_iter()
        .enumerate()
        .map(|(idx, result)| {
            let has_mastery_award = db
                .students
                .iter()
                .find(|s| s.username == result.student_name)
                .is_some_and(|s| s.has_achievement(MASTERY_AWARD));
            QuizStanding {
                rank: idx + 1,
                percent: result.score * 10,
                has_mastery_award,
                result,
            }
        })
        .collect()
}

/// Whether a finished attempt earns the mastery award.
pub fn is_mastery_award(score: u32, time_spent: u32) -> bool {
    score >= MASTERY_MIN_SCORE && time_spent < MASTERY_MAX_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PracticeSubmission, Student, SubmissionStatus};

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            username: name.to_lowercase(),
            display_name: name.to_string(),
            password: "pw".to_string(),
            belt: Belt::White,
            achievements: Vec::new(),
        }
    }

    fn graded(id: &str, student_id: &str, score: Option<u8>) -> PracticeSubmission {
        PracticeSubmission {
            id: id.to_string(),
            student_id: student_id.to_string(),
            student_name: student_id.to_string(),
            lesson_id: "l1".to_string(),
            lesson_title: "Kihon".to_string(),
            video_blob_url: "blob:x".to_string(),
            timestamp: 0,
            status: if score.is_some() {
                SubmissionStatus::Approved
            } else {
                SubmissionStatus::Pending
            },
            score,
            feedback: None,
        }
    }

    fn result(id: &str, student_name: &str, score: u32, time_spent: u32) -> QuizResult {
        QuizResult {
            id: id.to_string(),
            student_name: student_name.to_string(),
            belt: Belt::White,
            score,
            total_questions: 10,
            time_spent,
            timestamp: 0,
            answers: Vec::new(),
        }
    }

    #[test]
    fn test_practice_leaderboard_orders_and_excludes_zero() {
        let db = Datastore {
            students: vec![student("a", "A"), student("b", "B"), student("c", "C")],
            submissions: vec![
                graded("1", "a", Some(7)),
                graded("2", "b", Some(10)),
                graded("3", "a", Some(5)),
                graded("4", "b", Some(10)),
                graded("5", "b", Some(10)),
                graded("6", "c", None),
                graded("7", "ghost", Some(10)),
            ],
            ..Default::default()
        };

        let board = practice_leaderboard(&db);
        let ids: Vec<_> = board.iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(board[0].total_points, 30);
        assert_eq!(board[1].total_points, 12);
    }

    #[test]
    fn test_practice_board_caps_and_names_legend() {
        let students: Vec<Student> = (0..12)
            .map(|i| student(&format!("s{i}"), &format!("S{i}")))
            .collect();
        let submissions = (0..12)
            .map(|i| graded(&format!("g{i}"), &format!("s{i}"), Some(i as u8 % 10 + 1)))
            .collect();
        let db = Datastore {
            students,
            submissions,
            ..Default::default()
        };

        let board = practice_board(&db);
        assert_eq!(board.entries.len(), PRACTICE_BOARD_SIZE);
        assert_eq!(board.legend.unwrap().total_points, 10);
    }

    #[test]
    fn test_practice_board_empty_has_no_legend() {
        let board = practice_board(&Datastore::default());
        assert!(board.legend.is_none());
        assert!(board.entries.is_empty());
    }

    #[test]
    fn test_quiz_leaderboard_breaks_ties_on_time() {
        let results = vec![
            result("slow", "a", 8, 120),
            result("fast", "b", 8, 90),
            result("best", "c", 10, 250),
        ];

        let ids: Vec<_> = quiz_leaderboard(&results)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["best", "fast", "slow"]);
    }

    #[test]
    fn test_quiz_leaderboard_keeps_top_fifty() {
        let results: Vec<_> = (0..60)
            .map(|i| result(&format!("r{i}"), "a", i % 11, 100))
            .collect();
        assert_eq!(quiz_leaderboard(&results).len(), QUIZ_BOARD_SIZE);
    }

    #[test]
    fn test_quiz_board_marks_award_holders() {
        let mut holder = student("a", "Akuma");
        holder.achievements.push(MASTERY_AWARD.to_string());
        let db = Datastore {
            students: vec![holder, student("b", "Blanka")],
            results: vec![result("r1", "akuma", 9, 100), result("r2", "blanka", 7, 100)],
            ..Default::default()
        };

        let board = quiz_board(&db);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].percent, 90);
        assert!(board[0].has_mastery_award);
        assert!(!board[1].has_mastery_award);
    }

    #[test]
    fn test_mastery_award_boundary() {
        assert!(is_mastery_award(9, 179));
        assert!(!is_mastery_award(9, 180));
        assert!(!is_mastery_award(8, 10));
        assert!(is_mastery_award(10, 0));
    }
}
