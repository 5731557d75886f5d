use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::Mutex;

use crate::{config::Config, generator::QuestionGenerator, session::QuizManager};

/// The one quiz session this service hosts.
/// Handlers lock it for the whole action, so actions never interleave.
pub type SharedSession = Arc<Mutex<QuizManager>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub generator: Arc<QuestionGenerator>,
    pub session: SharedSession,
}

impl AppState {
    pub fn new(config: Config, generator: QuestionGenerator) -> Self {
        let session = QuizManager::new(config.results_dir.clone());
        Self {
            config,
            generator: Arc::new(generator),
            session: Arc::new(Mutex::new(session)),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuestionGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}

impl FromRef<AppState> for SharedSession {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}
