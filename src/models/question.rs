// src/models/question.rs

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use validator::Validate;

use crate::error::InvalidQuestion;

/// Marker a fill-in-the-blank question must contain.
pub const BLANK_MARKER: &str = "___";

/// The two question shapes the generator knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(alias = "mcq", alias = "MCQ", alias = "Multiple Choice")]
    MultipleChoice,
    #[serde(alias = "fill_in_the_blank", alias = "Fill in the Blank")]
    FillBlank,
}

impl QuestionKind {
    /// Label used in the `question_type` column of result tables.
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "MCQ",
            QuestionKind::FillBlank => "Fill in the blank",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A multiple-choice question as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct McqQuestion {
    #[serde(deserialize_with = "question_text")]
    pub question: String,

    #[serde(deserialize_with = "text_list")]
    #[validate(
        length(equal = 4, message = "MCQ must have exactly 4 options"),
        custom(function = validate_distinct_options)
    )]
    pub options: Vec<String>,

    #[serde(deserialize_with = "text")]
    pub correct_answer: String,
}

/// A fill-in-the-blank question as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FillBlankQuestion {
    #[serde(deserialize_with = "question_text")]
    #[validate(contains(pattern = "___", message = "Fill in blanks should contain '___'"))]
    pub question: String,

    #[serde(deserialize_with = "text")]
    pub answer: String,
}

impl McqQuestion {
    pub fn check_structure(&self) -> Result<(), InvalidQuestion> {
        self.validate()
            .map_err(|e| InvalidQuestion(e.to_string()))?;

        if !self.options.contains(&self.correct_answer) {
            return Err(InvalidQuestion(format!(
                "correct answer {:?} is not one of the options",
                self.correct_answer
            )));
        }
        Ok(())
    }
}

impl FillBlankQuestion {
    pub fn check_structure(&self) -> Result<(), InvalidQuestion> {
        self.validate()
            .map_err(|e| InvalidQuestion(e.to_string()))
    }
}

/// A question held by a quiz session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    MultipleChoice(McqQuestion),
    FillBlank(FillBlankQuestion),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Question::FillBlank(_) => QuestionKind::FillBlank,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.question,
            Question::FillBlank(q) => &q.question,
        }
    }

    pub fn correct_answer(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.correct_answer,
            Question::FillBlank(q) => &q.answer,
        }
    }

    /// Options to render; empty for fill-in-the-blank.
    pub fn options(&self) -> &[String] {
        match self {
            Question::MultipleChoice(q) => &q.options,
            Question::FillBlank(_) => &[],
        }
    }

    pub fn check_structure(&self) -> Result<(), InvalidQuestion> {
        match self {
            Question::MultipleChoice(q) => q.check_structure(),
            Question::FillBlank(q) => q.check_structure(),
        }
    }

    /// Multiple choice compares the selected option exactly.
    /// Fill-in-the-blank ignores case and surrounding whitespace.
    pub fn is_correct(&self, answer: &str) -> bool {
        match self {
            Question::MultipleChoice(q) => answer == q.correct_answer,
            Question::FillBlank(q) => {
                answer.trim().to_lowercase() == q.answer.trim().to_lowercase()
            }
        }
    }
}

impl From<McqQuestion> for Question {
    fn from(q: McqQuestion) -> Self {
        Question::MultipleChoice(q)
    }
}

impl From<FillBlankQuestion> for Question {
    fn from(q: FillBlankQuestion) -> Self {
        Question::FillBlank(q)
    }
}

/// DTO for sending a question to the client (excludes the answer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub index: usize,
    pub question: String,
    pub question_type: QuestionKind,
    pub options: Vec<String>,
}

impl PublicQuestion {
    pub fn from_question(index: usize, question: &Question) -> Self {
        Self {
            index,
            question: question.text().to_string(),
            question_type: question.kind(),
            options: question.options().to_vec(),
        }
    }
}

fn validate_distinct_options(options: &[String]) -> Result<(), validator::ValidationError> {
    let unique: HashSet<&str> = options.iter().map(|o| o.trim()).collect();
    if unique.len() != options.len() {
        return Err(validator::ValidationError::new("options_must_be_distinct"));
    }
    Ok(())
}

/// Turns a raw `question` value into plain text.
///
/// Models sometimes echo the schema back and put the text under a
/// `description` key; a mapping without one is kept as its JSON text.
pub fn normalize_question_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Object(map) => match map.get("description") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => Some(Value::Object(map).to_string()),
            Some(other) => Some(other.to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn question_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    normalize_question_text(Value::deserialize(deserializer)?)
        .ok_or_else(|| D::Error::custom("question must not be null"))
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?)
        .ok_or_else(|| D::Error::custom("expected a text value"))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|v| scalar_text(v).ok_or_else(|| D::Error::custom("options must be text values")))
        .collect()
}
