//! Student registration and login against the student list.

use chrono::Utc;
use rand::Rng;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{LoginRequest, RegisterRequest, Student};

const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 5;

/// Register a new student and persist it.
///
/// The username is trimmed and lower-cased before the uniqueness check.
pub async fn register(repo: &Repository, request: &RegisterRequest) -> Result<Student, AppError> {
    if request.display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name is required".to_string()));
    }
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("Warrior ID is required".to_string()));
    }
    // Passwords are compared verbatim, so only an empty one is rejected.
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let mut db = repo.load().await?;
    let username = request.username.trim().to_lowercase();

    if db.find_student_by_username(&username).is_some() {
        return Err(AppError::Conflict(
            "This Warrior ID is already taken.".to_string(),
        ));
    }

    let student = Student {
        id: generate_student_id(Utc::now().timestamp_millis(), &mut rand::thread_rng()),
        username,
        display_name: request.display_name.clone(),
        password: request.password.clone(),
        belt: request.belt,
        achievements: Vec::new(),
    };

    db.students.push(student.clone());
    repo.save(&db).await?;

    tracing::info!(
        "Registered student {} ({}) at {} belt",
        student.username,
        student.id,
        student.belt.as_str()
    );
    Ok(student)
}

/// Look up a student by username and check the password.
///
/// Unknown usernames and wrong passwords fail with different messages.
pub async fn login(repo: &Repository, request: &LoginRequest) -> Result<Student, AppError> {
    let db = repo.load().await?;

    let student = db
        .find_student_by_username(&request.username)
        .ok_or_else(|| AppError::NotFound("Warrior ID not found.".to_string()))?;

    if student.password != request.password {
        return Err(AppError::Unauthorized("Incorrect Password.".to_string()));
    }

    Ok(student.clone())
}

/// Build a student id from a millisecond timestamp and a random base36 suffix.
pub fn generate_student_id<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("student_{}_{}", now_millis, suffix)
}
