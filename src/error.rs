// src/error.rs

use std::{fmt, path::PathBuf};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::question::QuestionKind;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoQuiz => AppError::NotFound(err.to_string()),
            SessionError::IndexOutOfRange { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Failure talking to the LLM endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to LLM endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM endpoint answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("LLM completion carried no message content")]
    EmptyCompletion,
}

/// Why one prompt/parse cycle did not yield a question.
/// Both variants consume one unit of the retry budget.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not parse LLM response: {0}")]
    Parse(String),
}

/// A parsed question that breaks its shape's structural rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidQuestion(pub String);

/// Terminal failure of the generation engine for one question.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: AttemptError,
    },

    #[error("invalid {kind} structure: {source}")]
    Invalid {
        kind: QuestionKind,
        #[source]
        source: InvalidQuestion,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No quiz available. Generate one first.")]
    NoQuiz,

    #[error("Question index {index} is out of range (quiz has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure while writing a results file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to create results directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write results to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to move results into {path}: {source}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
