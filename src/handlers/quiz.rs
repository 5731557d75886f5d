// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::{AppError, SessionError},
    generator::QuestionGenerator,
    models::quiz::{
        AnswerRequest, GenerateQuizRequest, GenerateQuizResponse, QuizResultsResponse,
        SubmitQuizRequest,
    },
    session::GENERATION_FAILED_MESSAGE,
    state::SharedSession,
};

/// Generates a fresh quiz, replacing whatever the session held.
///
/// A failed generation is not an HTTP error: the response carries
/// `success: false` and a message the client can show as is.
pub async fn generate_quiz(
    State(generator): State<Arc<QuestionGenerator>>,
    State(session): State<SharedSession>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut quiz = session.lock().await;
    let success = quiz
        .generate_questions(
            &generator,
            payload.topic.trim(),
            payload.question_type,
            &payload.difficulty,
            payload.num_questions as usize,
        )
        .await;

    if !success {
        return Ok(Json(GenerateQuizResponse {
            success: false,
            message: quiz
                .last_error()
                .unwrap_or(GENERATION_FAILED_MESSAGE)
                .to_string(),
            questions: Vec::new(),
        }));
    }

    let questions = quiz.questions()?;
    Ok(Json(GenerateQuizResponse {
        success: true,
        message: format!("Generated {} questions", questions.len()),
        questions,
    }))
}

/// Returns the questions of the current quiz without their answers.
pub async fn get_quiz(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let quiz = session.lock().await;
    Ok(Json(quiz.questions()?))
}

/// Records the user's answer for one question (0-based index).
pub async fn record_answer(
    State(session): State<SharedSession>,
    Path(index): Path<usize>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = session.lock().await;
    quiz.record_answer(index, payload.answer)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Evaluates the quiz and returns the score with one row per question.
///
/// * An optional `answers` array is recorded first, index by index;
///   a batch longer than the quiz is rejected without recording any of it.
/// * Evaluating again recomputes and overwrites earlier results.
pub async fn submit_quiz(
    State(session): State<SharedSession>,
    payload: Option<Json<SubmitQuizRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = session.lock().await;
    if !quiz.is_ready() {
        return Err(SessionError::NoQuiz.into());
    }

    let req = payload.map(|Json(req)| req).unwrap_or_default();
    quiz.record_answers(req.answers)?;

    quiz.evaluate();
    let score = quiz.score();
    tracing::info!(
        "Quiz evaluated: {}/{} correct ({:.1}%)",
        score.correct,
        score.total,
        score.percentage
    );

    Ok(Json(QuizResultsResponse {
        score,
        results: quiz.results_table().to_vec(),
    }))
}
