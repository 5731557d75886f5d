// tests/api_tests.rs

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use study_buddy::{
    config::Config,
    error::TransportError,
    generator::QuestionGenerator,
    llm::LlmClient,
    routes,
    state::AppState,
};

const GEOMETRY_MCQ: &str = r#"{"question": "Which shape has three sides?", "options": ["Triangle", "Square", "Circle", "Hexagon"], "correct_answer": "Triangle"}"#;
const CAPITAL_FILL: &str = r#"```json
{"question": "The capital of France is ___.", "answer": "Paris"}
```"#;

/// Stand-in for the hosted model: replies with canned responses in order.
struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn invoke(&self, _prompt: &str) -> Result<String, TransportError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(TransportError::EmptyCompletion)
    }
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the results directory.
async fn spawn_app(responses: &[&str]) -> (String, PathBuf) {
    let results_dir = std::env::temp_dir().join(format!("study-buddy-api-{}", uuid::Uuid::new_v4()));

    let config = Config {
        groq_api_key: "test_key".to_string(),
        groq_api_url: "http://127.0.0.1:9/unused".to_string(),
        model_name: "test-model".to_string(),
        temperature: 0.0,
        max_retries: 3,
        results_dir: results_dir.clone(),
        bind_addr: "127.0.0.1:0".to_string(),
        rust_log: "error".to_string(),
    };

    let client = ScriptedClient {
        responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
    };
    let generator = QuestionGenerator::new(Arc::new(client), config.max_retries);
    let app = routes::create_router(AppState::new(config, generator));

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, results_dir)
}

async fn generate(
    client: &reqwest::Client,
    address: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/quiz/generate", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (address, _) = spawn_app(&[]).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn generate_single_geometry_mcq() {
    // Arrange
    let (address, _) = spawn_app(&[GEOMETRY_MCQ]).await;
    let client = reqwest::Client::new();

    // Act
    let response = generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "multiple_choice",
            "difficulty": "Easy",
            "num_questions": 1
        }),
    )
    .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);
    assert!(questions[0].get("correct_answer").is_none(), "answers must stay hidden");

    let current: Vec<serde_json::Value> = client
        .get(&format!("{}/api/quiz", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current.len(), 1);
}

#[tokio::test]
async fn wrong_mcq_answer_is_marked_incorrect() {
    let (address, _) = spawn_app(&[GEOMETRY_MCQ]).await;
    let client = reqwest::Client::new();

    generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "mcq",
            "num_questions": 1
        }),
    )
    .await;

    let answer = client
        .put(&format!("{}/api/quiz/answers/0", address))
        .json(&serde_json::json!({ "answer": "Square" }))
        .send()
        .await
        .unwrap();
    assert_eq!(answer.status().as_u16(), 204);

    let submit = client
        .post(&format!("{}/api/quiz/submit", address))
        .send()
        .await
        .unwrap();
    assert_eq!(submit.status().as_u16(), 200);

    let body: serde_json::Value = submit.json().await.unwrap();
    assert_eq!(body["results"][0]["is_correct"], false);
    assert_eq!(body["results"][0]["user_answer"], "Square");
    assert_eq!(body["results"][0]["correct_answer"], "Triangle");
    assert_eq!(body["score"]["correct"], 0);
}

#[tokio::test]
async fn answer_index_out_of_range_is_rejected() {
    let (address, _) = spawn_app(&[GEOMETRY_MCQ]).await;
    let client = reqwest::Client::new();

    generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "mcq",
            "num_questions": 1
        }),
    )
    .await;

    let response = client
        .put(&format!("{}/api/quiz/answers/5", address))
        .json(&serde_json::json!({ "answer": "Square" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn failed_generation_reports_failure_and_hides_partial_quiz() {
    // First question succeeds, the second never parses.
    let (address, _) = spawn_app(&[GEOMETRY_MCQ, "oops", "still not json", "nope"]).await;
    let client = reqwest::Client::new();

    let response = generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "multiple_choice",
            "num_questions": 2
        }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["questions"].as_array().unwrap().is_empty());

    let current = client
        .get(&format!("{}/api/quiz", address))
        .send()
        .await
        .unwrap();
    assert_eq!(current.status().as_u16(), 404);
}

#[tokio::test]
async fn generate_fails_validation() {
    let (address, _) = spawn_app(&[]).await;
    let client = reqwest::Client::new();

    // Act: ask for more questions than allowed
    let response = generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "multiple_choice",
            "num_questions": 11
        }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn save_without_results_writes_nothing() {
    let (address, results_dir) = spawn_app(&[GEOMETRY_MCQ]).await;
    let client = reqwest::Client::new();

    generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "mcq",
            "num_questions": 1
        }),
    )
    .await;

    let body: serde_json::Value = client
        .post(&format!("{}/api/quiz/results/save", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["saved"], false);
    assert!(body["warning"].is_string());
    assert!(!results_dir.exists());
}

#[tokio::test]
async fn save_results_flow() {
    // Arrange
    let (address, results_dir) = spawn_app(&[CAPITAL_FILL, CAPITAL_FILL]).await;
    let client = reqwest::Client::new();

    // 1. Generate two fill-in-the-blank questions
    let generated: serde_json::Value = generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geography",
            "question_type": "fill_blank",
            "difficulty": "medium",
            "num_questions": 2
        }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(generated["success"], true);

    // 2. Submit answers in one batch
    let results: serde_json::Value = client
        .post(&format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({ "answers": ["  PARIS ", "Lyon"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["results"][0]["is_correct"], true);
    assert_eq!(results["results"][1]["is_correct"], false);
    assert_eq!(results["score"]["percentage"], 50.0);

    // 3. Save
    let saved: serde_json::Value = client
        .post(&format!("{}/api/quiz/results/save", address))
        .json(&serde_json::json!({ "prefix": "geo" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved["saved"], true);

    let path = PathBuf::from(saved["path"].as_str().unwrap());
    assert!(path.exists());
    assert!(path.starts_with(&results_dir));
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);

    // 4. Download
    let download = client
        .get(&format!("{}{}", address, saved["download_url"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(download.status().as_u16(), 200);
    assert_eq!(download.text().await.unwrap(), content);

    std::fs::remove_dir_all(&results_dir).unwrap();
}

#[tokio::test]
async fn oversized_answer_batch_is_rejected_whole() {
    let (address, _) = spawn_app(&[GEOMETRY_MCQ]).await;
    let client = reqwest::Client::new();

    generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "mcq",
            "num_questions": 1
        }),
    )
    .await;

    client
        .put(&format!("{}/api/quiz/answers/0", address))
        .json(&serde_json::json!({ "answer": "Triangle" }))
        .send()
        .await
        .unwrap();

    // Two answers for a one-question quiz
    let rejected = client
        .post(&format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({ "answers": ["Square", "Circle"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status().as_u16(), 400);

    let results: serde_json::Value = client
        .get(&format!("{}/api/quiz/results", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(results["results"].as_array().unwrap().is_empty());

    // The earlier answer survived the rejected batch
    let submitted: serde_json::Value = client
        .post(&format!("{}/api/quiz/submit", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(submitted["results"][0]["user_answer"], "Triangle");
    assert_eq!(submitted["results"][0]["is_correct"], true);
}

#[tokio::test]
async fn failed_save_keeps_results_available() {
    let (address, results_dir) = spawn_app(&[GEOMETRY_MCQ]).await;
    let client = reqwest::Client::new();
    // A plain file where the results directory should go
    std::fs::write(&results_dir, "").unwrap();

    generate(
        &client,
        &address,
        serde_json::json!({
            "topic": "geometry",
            "question_type": "mcq",
            "num_questions": 1
        }),
    )
    .await;
    client
        .post(&format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({ "answers": ["Triangle"] }))
        .send()
        .await
        .unwrap();

    let saved = client
        .post(&format!("{}/api/quiz/results/save", address))
        .send()
        .await
        .unwrap();
    assert_eq!(saved.status().as_u16(), 200);
    let saved: serde_json::Value = saved.json().await.unwrap();
    assert_eq!(saved["saved"], false);
    assert!(saved["warning"].is_string());
    assert!(saved["path"].is_null());

    let results: serde_json::Value = client
        .get(&format!("{}/api/quiz/results", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["results"].as_array().unwrap().len(), 1);
    assert_eq!(results["results"][0]["is_correct"], true);

    std::fs::remove_file(&results_dir).unwrap();
}
