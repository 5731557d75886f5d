// src/handlers/results.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    config::DEFAULT_RESULTS_PREFIX,
    error::AppError,
    models::quiz::{QuizResultsResponse, SaveResultsRequest, SaveResultsResponse},
    state::SharedSession,
};

/// Returns the last evaluation; both fields are empty before submission.
pub async fn get_results(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let quiz = session.lock().await;
    Ok(Json(QuizResultsResponse {
        score: quiz.score(),
        results: quiz.results_table().to_vec(),
    }))
}

/// Saves the results table as CSV and returns where to download it.
///
/// Nothing to save and write failures both come back as a warning with
/// `saved: false`; the results stay available in memory either way.
pub async fn save_results(
    State(session): State<SharedSession>,
    payload: Option<Json<SaveResultsRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let req = payload.map(|Json(req)| req).unwrap_or_default();
    let prefix = req.prefix.as_deref().unwrap_or(DEFAULT_RESULTS_PREFIX);

    let quiz = session.lock().await;
    let response = match quiz.persist_results(prefix) {
        Ok(Some(path)) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    AppError::InternalServerError(format!("saved path {} has no file name", path.display()))
                })?;

            SaveResultsResponse {
                saved: true,
                path: Some(path.display().to_string()),
                download_url: Some(format!("/results/{}", file_name)),
                file_name: Some(file_name),
                warning: None,
            }
        }
        Ok(None) => SaveResultsResponse {
            warning: Some("No results available".to_string()),
            ..Default::default()
        },
        Err(e) => {
            tracing::warn!("Failed to save results: {}", e);
            SaveResultsResponse {
                warning: Some("Failed to save results".to_string()),
                ..Default::default()
            }
        }
    };

    Ok(Json(response))
}
