// src/prompts.rs

use crate::models::question::{BLANK_MARKER, QuestionKind};

pub const MCQ_PROMPT_TEMPLATE: &str = r#"Generate a {difficulty} multiple-choice question about {topic}.

Return ONLY a JSON object with these exact fields:
- "question": a clear, specific question
- "options": an array of exactly 4 distinct possible answers
- "correct_answer": one of the options, copied exactly

Example format:
{
    "question": "What is the capital of France?",
    "options": ["London", "Berlin", "Paris", "Madrid"],
    "correct_answer": "Paris"
}

Your response:"#;

pub const FILL_BLANK_PROMPT_TEMPLATE: &str = r#"Generate a {difficulty} fill-in-the-blank question about {topic}.

Return ONLY a JSON object with these exact fields:
- "question": a sentence with "{blank}" marking where the blank goes
- "answer": the correct word or phrase for the blank

Example format:
{
    "question": "The capital of France is {blank}.",
    "answer": "Paris"
}

Your response:"#;

/// Fills the template for `kind` with the topic and difficulty.
pub fn render(kind: QuestionKind, topic: &str, difficulty: &str) -> String {
    let template = match kind {
        QuestionKind::MultipleChoice => MCQ_PROMPT_TEMPLATE,
        QuestionKind::FillBlank => FILL_BLANK_PROMPT_TEMPLATE,
    };

    template
        .replace("{blank}", BLANK_MARKER)
        .replace("{topic}", topic)
        .replace("{difficulty}", difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let prompt = render(QuestionKind::MultipleChoice, "geometry", "easy");
        assert!(prompt.starts_with("Generate a easy multiple-choice question about geometry."));
        assert!(!prompt.contains("{topic}"));
    }

    #[test]
    fn test_fill_blank_prompt_shows_marker() {
        let prompt = render(QuestionKind::FillBlank, "history", "hard");
        assert!(prompt.contains("The capital of France is ___."));
    }
}
