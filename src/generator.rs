// src/generator.rs

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{
    error::{AttemptError, GenerationError},
    llm::LlmClient,
    models::question::{FillBlankQuestion, McqQuestion, Question, QuestionKind},
    prompts,
};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("valid fence regex"));

/// Produces one validated question per call.
///
/// Each call makes at most `max_retries` LLM requests. Transport and parse
/// failures consume an attempt; a parsed question that fails structural
/// validation ends the call at once.
pub struct QuestionGenerator {
    client: Arc<dyn LlmClient>,
    max_retries: u32,
}

impl QuestionGenerator {
    pub fn new(client: Arc<dyn LlmClient>, max_retries: u32) -> Self {
        Self {
            client,
            max_retries: max_retries.max(1),
        }
    }

    pub async fn generate(
        &self,
        kind: QuestionKind,
        topic: &str,
        difficulty: &str,
    ) -> Result<Question, GenerationError> {
        match kind {
            QuestionKind::MultipleChoice => self
                .generate_mcq(topic, difficulty)
                .await
                .map(Question::from),
            QuestionKind::FillBlank => self
                .generate_fill_blank(topic, difficulty)
                .await
                .map(Question::from),
        }
    }

    pub async fn generate_mcq(
        &self,
        topic: &str,
        difficulty: &str,
    ) -> Result<McqQuestion, GenerationError> {
        let kind = QuestionKind::MultipleChoice;
        let question: McqQuestion = self.retry_and_parse(kind, topic, difficulty).await?;

        question.check_structure().map_err(|source| {
            tracing::error!("Failed to generate MCQ: {}", source);
            GenerationError::Invalid { kind, source }
        })?;

        tracing::info!("Generated a valid MCQ question");
        Ok(question)
    }

    pub async fn generate_fill_blank(
        &self,
        topic: &str,
        difficulty: &str,
    ) -> Result<FillBlankQuestion, GenerationError> {
        let kind = QuestionKind::FillBlank;
        let question: FillBlankQuestion = self.retry_and_parse(kind, topic, difficulty).await?;

        question.check_structure().map_err(|source| {
            tracing::error!("Failed to generate fill in the blank: {}", source);
            GenerationError::Invalid { kind, source }
        })?;

        tracing::info!("Generated a valid fill in the blank question");
        Ok(question)
    }

    /// One prompt/parse cycle.
    async fn attempt<T>(&self, prompt: &str) -> Result<T, AttemptError>
    where
        T: DeserializeOwned + Send,
    {
        let raw = self.client.invoke(prompt).await?;
        parse_response(&raw)
    }

    async fn retry_and_parse<T>(
        &self,
        kind: QuestionKind,
        topic: &str,
        difficulty: &str,
    ) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + Send,
    {
        let prompt = prompts::render(kind, topic, difficulty);
        let mut attempt = 1;

        loop {
            tracing::info!(
                attempt,
                max_retries = self.max_retries,
                %kind,
                "Generating question for topic {:?} with difficulty {:?}",
                topic,
                difficulty
            );

            match self.attempt::<T>(&prompt).await {
                Ok(parsed) => {
                    tracing::info!(attempt, "Successfully parsed the question");
                    return Ok(parsed);
                }
                Err(source) if attempt >= self.max_retries => {
                    tracing::error!(attempt, "Giving up on question: {}", source);
                    return Err(GenerationError::Exhausted {
                        attempts: attempt,
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, "Attempt failed: {}", e);
                    attempt += 1;
                }
            }
        }
    }
}

/// Parses a model response into `T`.
///
/// Accepts bare JSON, JSON inside a markdown code fence, or JSON surrounded
/// by prose; the outermost `{ ... }` span is what gets decoded.
pub fn parse_response<T: DeserializeOwned>(raw: &str) -> Result<T, AttemptError> {
    let body = CODE_FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or(raw, |m| m.as_str());

    let json = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => {
            return Err(AttemptError::Parse(
                "response contains no JSON object".to_string(),
            ));
        }
    };

    serde_json::from_str(json).map_err(|e| AttemptError::Parse(e.to_string()))
}
