// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{quiz, results},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the quiz API under `/api/quiz`.
/// * Serves saved CSV files from the results directory under `/results`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::get_quiz))
        .route("/generate", post(quiz::generate_quiz))
        .route("/answers/{index}", put(quiz::record_answer))
        .route("/submit", post(quiz::submit_quiz))
        .route("/results", get(results::get_results))
        .route("/results/save", post(results::save_results));

    let downloads = ServeDir::new(&state.config.results_dir);

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest_service("/results", downloads)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
