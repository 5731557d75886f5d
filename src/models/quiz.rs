// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    config::{DEFAULT_DIFFICULTY, MAX_QUESTIONS_PER_QUIZ, MIN_QUESTIONS_PER_QUIZ},
    models::{
        question::{PublicQuestion, QuestionKind},
        result::{ResultRecord, ScoreSummary},
    },
};

const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// DTO for starting a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(
        length(min = 1, max = 200, message = "Topic length must be between 1 and 200 characters."),
        custom(function = validate_not_blank)
    )]
    pub topic: String,

    pub question_type: QuestionKind,

    #[serde(default = "default_difficulty")]
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: String,

    #[validate(range(
        min = MIN_QUESTIONS_PER_QUIZ,
        max = MAX_QUESTIONS_PER_QUIZ,
        message = "Number of questions must be between 1 and 10."
    ))]
    pub num_questions: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub success: bool,
    pub message: String,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// DTO for submitting a quiz.
/// `answers`, when present, is recorded index by index before evaluation.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResultsResponse {
    pub score: ScoreSummary,
    pub results: Vec<ResultRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveResultsRequest {
    pub prefix: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SaveResultsResponse {
    pub saved: bool,
    pub path: Option<String>,
    pub file_name: Option<String>,
    pub download_url: Option<String>,
    pub warning: Option<String>,
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("topic_cannot_be_blank"));
    }
    Ok(())
}

fn validate_difficulty(value: &str) -> Result<(), validator::ValidationError> {
    let value = value.trim().to_lowercase();
    if !DIFFICULTIES.contains(&value.as_str()) {
        return Err(validator::ValidationError::new("unknown_difficulty"));
    }
    Ok(())
}
