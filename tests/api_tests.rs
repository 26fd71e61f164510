// tests/api_tests.rs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_grader::{
    config::Config,
    models::{
        question::{AnswerKey, Content, Question},
        submission::SubmissionRecord,
    },
    pipeline::{
        SubmissionPipeline,
        notifier::{DeliveryError, Notifier},
        recorder::{StorageError, SubmissionRecorder},
    },
    report::ReportDocument,
    routes,
    state::AppState,
    utils::media::MediaResolver,
};
use serde_json::{Value, json};
use sqlx::types::Json;

/// In-memory stand-in for the submissions table.
#[derive(Default)]
struct MemoryRecorder {
    records: Mutex<Vec<SubmissionRecord>>,
    fail: bool,
}

#[async_trait]
impl SubmissionRecorder for MemoryRecorder {
    async fn record(
        &self,
        email: &str,
        answers: &[Value],
        correct_count: usize,
    ) -> Result<SubmissionRecord, StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable("connection refused".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let record = SubmissionRecord {
            id: records.len() as i64 + 1,
            email: email.to_string(),
            answers: Json(answers.to_vec()),
            score: correct_count as i32,
            created_at: chrono::Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }
}

/// Captures outgoing reports instead of talking to an SMTP server.
#[derive(Default)]
struct MemoryNotifier {
    sent: Mutex<Vec<(String, ReportDocument)>>,
    fail: bool,
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, recipient: &str, report: &ReportDocument) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Transport("connection reset".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), report.clone()));
        Ok(())
    }
}

/// Three image questions whose correct choices are 0, 3 and 2.
fn answer_key() -> AnswerKey {
    let questions = [0, 3, 2]
        .into_iter()
        .enumerate()
        .map(|(i, correct_index)| Question {
            id: i as i64 + 1,
            prompt: Content::Image(format!("images/problem{}.png", i + 1)),
            choices: (1..=5)
                .map(|c| Content::Image(format!("images/answer{}-{}.png", i + 1, c)))
                .collect(),
            correct_index,
        })
        .collect();
    AnswerKey::new(questions).expect("test key is valid")
}

fn test_config(static_dir: &str) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        mail_user: "quiz@example.com".to_string(),
        mail_pass: "unused".to_string(),
        smtp_host: "localhost".to_string(),
        base_url: "http://quiz.test".to_string(),
        answer_key_path: None,
        static_dir: static_dir.to_string(),
        port: 0,
        rust_log: "error".to_string(),
    }
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(
    recorder: Arc<MemoryRecorder>,
    notifier: Arc<MemoryNotifier>,
    static_dir: &str,
) -> String {
    let config = test_config(static_dir);
    let media = MediaResolver::new(&config.base_url).expect("valid base url");

    let pipeline = SubmissionPipeline::new(Arc::new(answer_key()), recorder, notifier, media);

    let state = AppState {
        pipeline: Arc::new(pipeline),
        config,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn spawn_default() -> (String, Arc<MemoryRecorder>, Arc<MemoryNotifier>) {
    let recorder = Arc::new(MemoryRecorder::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let address = spawn_app(recorder.clone(), notifier.clone(), "public/images").await;
    (address, recorder, notifier)
}

async fn post_submit(address: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/submit", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn health_check_404() {
    let (address, _, _) = spawn_default().await;

    let response = reqwest::get(format!("{}/random_path_that_does_not_exist", address))
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_with_one_miss() {
    // Arrange
    let (address, recorder, notifier) = spawn_default().await;
    let email = format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8]);

    // Act
    let response = post_submit(
        &address,
        json!({ "email": email, "answers": [0, 3, 4] }),
    )
    .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 2);
    assert_eq!(body["bandedScore"], 5);
    assert!(body["message"].is_string());

    let records = recorder.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].email, email);
    assert_eq!(records[0].answers.0, vec![json!(0), json!(3), json!(4)]);
    assert_eq!(records[0].score, 2);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (recipient, report) = &sent[0];
    assert_eq!(recipient, &email);
    assert_eq!(report.subject, "Quiz Results");
    assert_eq!(report.remediation.len(), 1);
    assert_eq!(report.remediation[0].question_number, 3);
    assert!(report.html.contains("<h4>Q3</h4>"));
    assert!(report.html.contains("http://quiz.test/images/problem3.png"));
    assert!(report.html.contains("http://quiz.test/images/answer3-3.png"));
}

#[tokio::test]
async fn submit_all_wrong() {
    let (address, _, notifier) = spawn_default().await;

    let response = post_submit(
        &address,
        json!({ "email": "all.wrong@example.com", "answers": [1, 1, 1] }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 0);
    assert_eq!(body["bandedScore"], 0);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent[0].1.remediation.len(), 3);
}

#[tokio::test]
async fn submit_perfect_score_congratulates() {
    let (address, _, notifier) = spawn_default().await;

    let response = post_submit(
        &address,
        json!({ "email": "ace@example.com", "answers": [0, 3, 2] }),
    )
    .await;

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 3);
    assert_eq!(body["bandedScore"], 10);

    let sent = notifier.sent.lock().unwrap();
    assert!(sent[0].1.remediation.is_empty());
    assert!(sent[0].1.html.contains("Congratulations"));
}

#[tokio::test]
async fn submit_short_and_null_answers_count_as_misses() {
    let (address, recorder, _) = spawn_default().await;

    let response = post_submit(
        &address,
        json!({ "email": "short@example.com", "answers": [0] }),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 1);
    assert_eq!(body["bandedScore"], 2);

    let response = post_submit(
        &address,
        json!({ "email": "nulls@example.com", "answers": [null, 3, -1] }),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 1);

    // Answers are stored verbatim, including nulls and invalid indices.
    let records = recorder.records.lock().unwrap();
    assert_eq!(records[1].answers.0, vec![Value::Null, json!(3), json!(-1)]);
}

#[tokio::test]
async fn submit_out_of_range_and_float_answers_are_graded_not_rejected() {
    let (address, recorder, _) = spawn_default().await;

    // Larger than any i64: a miss, not a malformed request.
    let response = reqwest::Client::new()
        .post(format!("{}/submit", address))
        .header("Content-Type", "application/json")
        .body(r#"{"email": "big@example.com", "answers": [0, 3, 99999999999999999999]}"#)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 2);
    assert_eq!(body["bandedScore"], 5);

    // An integral float selects the same choice as the integer.
    let response = reqwest::Client::new()
        .post(format!("{}/submit", address))
        .header("Content-Type", "application/json")
        .body(r#"{"email": "float@example.com", "answers": [0, 3.0, 2.5, "1"]}"#)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 2);

    let records = recorder.records.lock().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].answers.0.len(), 3);
    assert!(records[0].answers.0[2].is_f64());
    assert_eq!(records[1].answers.0, vec![json!(0), json!(3.0), json!(2.5), json!("1")]);
}

#[tokio::test]
async fn malformed_body_returns_generic_bad_request() {
    let (address, recorder, _) = spawn_default().await;

    let response = reqwest::Client::new()
        .post(format!("{}/submit", address))
        .header("Content-Type", "application/json")
        .body(r#"{"email": "x@example.com", "answers": "#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid request body" }));
    assert!(recorder.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn submit_fails_validation() {
    let (address, recorder, notifier) = spawn_default().await;

    let response = post_submit(
        &address,
        json!({ "email": "not-an-email", "answers": [0, 3, 2] }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(recorder.records.lock().unwrap().is_empty());
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn storage_failure_returns_generic_error_without_mail() {
    let recorder = Arc::new(MemoryRecorder {
        fail: true,
        ..Default::default()
    });
    let notifier = Arc::new(MemoryNotifier::default());
    let address = spawn_app(recorder, notifier.clone(), "public/images").await;

    let response = post_submit(
        &address,
        json!({ "email": "user@example.com", "answers": [0, 3, 2] }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delivery_failure_returns_generic_error_and_keeps_record() {
    let recorder = Arc::new(MemoryRecorder::default());
    let notifier = Arc::new(MemoryNotifier {
        fail: true,
        ..Default::default()
    });
    let address = spawn_app(recorder.clone(), notifier, "public/images").await;

    let response = post_submit(
        &address,
        json!({ "email": "user@example.com", "answers": [0, 3, 2] }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
    assert_eq!(recorder.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn images_are_served_from_static_dir() {
    let dir = std::env::temp_dir().join(format!("quiz_images_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("problem1.png"), b"fake-png").unwrap();

    let address = spawn_app(
        Arc::new(MemoryRecorder::default()),
        Arc::new(MemoryNotifier::default()),
        dir.to_str().unwrap(),
    )
    .await;

    let response = reqwest::get(format!("{}/images/problem1.png", address))
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"fake-png");

    std::fs::remove_dir_all(&dir).ok();
}
