//! Configuration module for the dojo backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// PIN used when `DOJO_TRAINER_PIN` is not set.
pub const DEFAULT_TRAINER_PIN: &str = "2005";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared trainer PIN
    pub trainer_pin: String,
    /// Path to the SQLite file holding the two documents
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Length of one quiz countdown tick
    pub quiz_tick: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let trainer_pin =
            env::var("DOJO_TRAINER_PIN").unwrap_or_else(|_| DEFAULT_TRAINER_PIN.to_string());

        let db_path = env::var("DOJO_DB_PATH")
            .unwrap_or_else(|_| "./data/dojo.sqlite".to_string())
            .into();

        let bind_addr = env::var("DOJO_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid DOJO_BIND_ADDR format");

        let log_level = env::var("DOJO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let quiz_tick_ms = env::var("DOJO_QUIZ_TICK_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(1000);

        Self {
            trainer_pin,
            db_path,
            bind_addr,
            log_level,
            quiz_tick: Duration::from_millis(quiz_tick_ms),
        }
    }
}
