// src/session.rs

use std::path::PathBuf;

use chrono::Local;

use crate::{
    error::{PersistenceError, SessionError},
    generator::QuestionGenerator,
    models::{
        question::{PublicQuestion, Question, QuestionKind},
        result::{ResultRecord, ScoreSummary},
    },
    utils::export::write_results_csv,
};

/// Message shown to the user when a quiz could not be produced.
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating questions. Please try again.";

/// Owns all state of one quiz session: questions, answers and results.
///
/// Every call to [`QuizManager::generate_questions`] discards the previous
/// session entirely before generating anything.
#[derive(Debug)]
pub struct QuizManager {
    questions: Vec<Question>,
    user_answers: Vec<String>,
    results: Vec<ResultRecord>,
    generated: bool,
    last_error: Option<String>,
    results_dir: PathBuf,
}

impl QuizManager {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            questions: Vec::new(),
            user_answers: Vec::new(),
            results: Vec::new(),
            generated: false,
            last_error: None,
            results_dir: results_dir.into(),
        }
    }

    fn reset(&mut self) {
        self.questions.clear();
        self.user_answers.clear();
        self.results.clear();
        self.generated = false;
        self.last_error = None;
    }

    /// Generates `count` questions one after another.
    ///
    /// Returns `false` as soon as one question fails. The questions produced
    /// before the failure stay in memory but the session is not ready.
    pub async fn generate_questions(
        &mut self,
        generator: &QuestionGenerator,
        topic: &str,
        kind: QuestionKind,
        difficulty: &str,
        count: usize,
    ) -> bool {
        self.reset();
        let difficulty = difficulty.trim().to_lowercase();

        for n in 1..=count {
            match generator.generate(kind, topic, &difficulty).await {
                Ok(question) => self.questions.push(question),
                Err(e) => {
                    tracing::error!("Error generating question {}/{}: {}", n, count, e);
                    self.last_error = Some(GENERATION_FAILED_MESSAGE.to_string());
                    return false;
                }
            }
        }

        tracing::info!("Generated {} {} questions on {:?}", count, kind, topic);
        self.generated = true;
        true
    }

    /// True once a generation succeeded with at least one question.
    pub fn is_ready(&self) -> bool {
        self.generated && !self.questions.is_empty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn questions(&self) -> Result<Vec<PublicQuestion>, SessionError> {
        if !self.is_ready() {
            return Err(SessionError::NoQuiz);
        }

        Ok(self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| PublicQuestion::from_question(i, q))
            .collect())
    }

    pub fn user_answers(&self) -> &[String] {
        &self.user_answers
    }

    /// Stores the answer for the question at `index` (0-based).
    /// Skipped positions are filled with empty answers to keep alignment.
    pub fn record_answer(&mut self, index: usize, value: impl Into<String>) -> Result<(), SessionError> {
        if !self.is_ready() {
            return Err(SessionError::NoQuiz);
        }
        if index >= self.questions.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }

        if index >= self.user_answers.len() {
            self.user_answers.resize(index + 1, String::new());
        }
        self.user_answers[index] = value.into();
        Ok(())
    }

    /// Stores a batch of answers by position, all or nothing: a batch
    /// longer than the quiz is rejected before any answer is written.
    pub fn record_answers(&mut self, answers: Vec<String>) -> Result<(), SessionError> {
        if !self.is_ready() {
            return Err(SessionError::NoQuiz);
        }
        if answers.len() > self.questions.len() {
            return Err(SessionError::IndexOutOfRange {
                index: self.questions.len(),
                len: self.questions.len(),
            });
        }

        for (index, answer) in answers.into_iter().enumerate() {
            self.record_answer(index, answer)?;
        }
        Ok(())
    }

    /// Scores every question against the recorded answers, replacing any
    /// previous results. Unanswered questions count as an empty answer.
    pub fn evaluate(&mut self) {
        self.results = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let user_answer = self.user_answers.get(i).cloned().unwrap_or_default();
                ResultRecord {
                    question_number: i + 1,
                    question: q.text().to_string(),
                    question_type: q.kind().label().to_string(),
                    is_correct: q.is_correct(&user_answer),
                    user_answer,
                    correct_answer: q.correct_answer().to_string(),
                    options: q.options().to_vec(),
                }
            })
            .collect();
    }

    /// Rows of the last evaluation; empty before `evaluate` runs.
    pub fn results_table(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn score(&self) -> ScoreSummary {
        ScoreSummary::from_records(&self.results)
    }

    /// Writes the results table to `{prefix}_{YYYYMMDD_HHMMSS}.csv` in the
    /// results directory. Returns `None` without touching the disk when
    /// there is nothing to save.
    pub fn persist_results(&self, prefix: &str) -> Result<Option<PathBuf>, PersistenceError> {
        if self.results.is_empty() {
            tracing::warn!("No results to save");
            return Ok(None);
        }

        write_results_csv(&self.results_dir, prefix, &self.results, Local::now()).map(Some)
    }
}
