// src/models/result.rs

use serde::{Deserialize, Serialize};

/// One evaluated question, as shown after submission and written to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// 1-based position in the quiz.
    pub question_number: usize,
    pub question: String,
    pub question_type: String,
    pub user_answer: String,
    pub correct_answer: String,
    /// Empty for fill-in-the-blank questions.
    pub options: Vec<String>,
    pub is_correct: bool,
}

/// Aggregated score over a results table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
}

impl ScoreSummary {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self {
                correct: 0,
                total: 0,
                percentage: 0.0,
            };
        }

        let correct = records.iter().filter(|r| r.is_correct).count();
        Self {
            correct,
            total,
            percentage: (correct as f64 / total as f64) * 100.0,
        }
    }
}
