//! Golden Shoto Karate Academy backend
//!
//! Training portal service: lessons, practice submissions, belt quizzes and
//! leaderboards over a two-document store.

mod api;
mod auth;
mod capture;
mod config;
mod db;
mod errors;
mod models;
mod quiz;
mod scoring;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{DocumentStore, MemoryDocumentStore, Repository, SqliteDocumentStore};
use quiz::QuizSessions;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub quizzes: Arc<QuizSessions>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        let repo = Arc::new(Repository::new(store));
        let quizzes = Arc::new(QuizSessions::new(
            repo.clone(),
            config.quiz_tick,
            StdRng::from_entropy(),
        ));
        Self {
            repo,
            quizzes,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting {}", api::ACADEMY_NAME);
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.trainer_pin == config::DEFAULT_TRAINER_PIN {
        tracing::warn!("Trainer PIN is the default (set DOJO_TRAINER_PIN to change it)");
    }

    // ":memory:" keeps both documents in process for throwaway runs
    let store: Arc<dyn DocumentStore> = if config.db_path.as_os_str() == ":memory:" {
        tracing::warn!("Using in-memory document store; nothing survives a restart");
        Arc::new(MemoryDocumentStore::new())
    } else {
        let pool = db::init_database(&config.db_path).await?;
        Arc::new(SqliteDocumentStore::new(pool))
    };

    let bind_addr = config.bind_addr;
    let state = AppState::new(store, config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the PIN for the trainer layer
    let pin = state.config.trainer_pin.clone();

    // Anonymous routes
    let public_routes = Router::new()
        .route("/academy", get(api::get_academy))
        .route("/belts", get(api::list_belts))
        .route("/students/register", post(api::register_student))
        .route("/session", get(api::get_session))
        .route("/session/login", post(api::login_student))
        .route("/session/logout", post(api::logout_student))
        .route("/leaderboard/practice", get(api::practice_leaderboard))
        .route("/leaderboard/quiz", get(api::quiz_leaderboard))
        .route("/trainer/login", post(api::trainer_login));

    // Student routes; each handler checks the session
    let student_routes = Router::new()
        .route("/me/lessons", get(api::my_lessons))
        .route("/me/submissions", get(api::my_submissions))
        .route("/me/submissions", post(api::submit_practice))
        .route("/me/quiz", get(api::get_quiz))
        .route("/me/quiz", post(api::start_quiz))
        .route("/me/quiz/answer", post(api::answer_quiz));

    // Trainer routes
    let trainer_routes = Router::new()
        .route("/trainer/lessons", get(api::list_lessons))
        .route("/trainer/lessons", post(api::create_lesson))
        .route("/trainer/lessons/{id}", delete(api::delete_lesson))
        .route("/trainer/submissions", get(api::list_submissions))
        .route("/trainer/submissions/{id}/grade", put(api::grade_submission))
        .route("/trainer/students", get(api::list_students))
        .route("/trainer/questions", get(api::list_questions))
        .route("/trainer/questions", post(api::import_questions))
        // Apply trainer PIN middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::trainer_pin_layer(pin.clone(), req, next)
        }));

    // Health check (no gate)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(student_routes).merge(trainer_routes),
        )
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
