// src/config.rs

use std::{env, path::PathBuf, str::FromStr};

use dotenvy::dotenv;

/// Bounds on how many questions a single quiz may hold.
pub const MIN_QUESTIONS_PER_QUIZ: u64 = 1;
pub const MAX_QUESTIONS_PER_QUIZ: u64 = 10;

/// Filename prefix used when the caller does not pick one.
pub const DEFAULT_RESULTS_PREFIX: &str = "quiz_results";

pub const DEFAULT_DIFFICULTY: &str = "medium";

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL_NAME: &str = "llama-3.1-8b-instant";
const DEFAULT_TEMPERATURE: f32 = 0.9;
const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub model_name: String,
    pub temperature: f32,
    /// LLM calls allowed per question. Never below 1.
    pub max_retries: u32,
    pub results_dir: PathBuf,
    pub bind_addr: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let groq_api_key = env::var("GROQ_API_KEY")
            .expect("GROQ_API_KEY must be set");

        let groq_api_url = env::var("GROQ_API_URL")
            .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string());

        let model_name = env::var("MODEL_NAME")
            .unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string());

        let temperature = parse_or("TEMPERATURE", DEFAULT_TEMPERATURE);

        let max_retries = parse_or("MAX_RETRIES", DEFAULT_MAX_RETRIES).max(1);

        let results_dir = env::var("RESULTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("results"));

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            groq_api_key,
            groq_api_url,
            model_name,
            temperature,
            max_retries,
            results_dir,
            bind_addr,
            rust_log,
        }
    }
}

/// Reads a numeric variable, keeping the default when it is absent or malformed.
fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
