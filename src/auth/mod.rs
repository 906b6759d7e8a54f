//! Access control for the three audiences: anonymous, student, and trainer.
//!
//! The trainer gate is a single shared PIN compared in constant time. There is
//! no per-trainer identity behind it.

mod students;

pub use students::*;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header carrying the trainer PIN on trainer routes.
pub const TRAINER_PIN_HEADER: &str = "x-trainer-pin";

/// Trainer gate layer; takes the expected PIN as a parameter.
pub async fn trainer_pin_layer(expected_pin: String, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(TRAINER_PIN_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(pin) if verify_trainer_pin(pin, &expected_pin).is_ok() => next.run(request).await,
        Some(_) => AppError::Unauthorized("Incorrect PIN.".to_string()).into_response(),
        None => AppError::Unauthorized("Trainer PIN required.".to_string()).into_response(),
    }
}

/// Check a PIN entered on the trainer login screen.
pub fn verify_trainer_pin(provided: &str, expected: &str) -> Result<(), AppError> {
    if constant_time_compare(provided, expected) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Incorrect PIN.".to_string()))
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
