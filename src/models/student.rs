//! Student model and the identity request bodies.

use serde::{Deserialize, Serialize};

use super::Belt;

/// A registered student as stored in the application document.
///
/// The password is kept in plain text; the portal makes no security claim
/// for student accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// Trimmed and lower-cased at registration.
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub belt: Belt,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl Student {
    pub fn has_achievement(&self, name: &str) -> bool {
        self.achievements.iter().any(|a| a == name)
    }
}

/// Student view returned over the API. Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub belt: Belt,
    pub achievements: Vec<String>,
}

impl From<&Student> for StudentProfile {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            username: student.username.clone(),
            display_name: student.display_name.clone(),
            belt: student.belt,
            achievements: student.achievements.clone(),
        }
    }
}

/// Request body for registering a new student.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub belt: Belt,
}

/// Request body for a student login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for the trainer PIN check.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainerLoginRequest {
    pub pin: String,
}
