//! Data models for the Golden Shoto training portal.
//!
//! Field names serialize in camelCase so the stored document keeps the shape
//! the portal front end already reads and writes.

mod belt;
mod datastore;
mod lesson;
mod question;
mod quiz_result;
mod student;
mod submission;

pub use belt::*;
pub use datastore::*;
pub use lesson::*;
pub use question::*;
pub use quiz_result::*;
pub use student::*;
pub use submission::*;
