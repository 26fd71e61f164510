// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use quiz_grader::config::Config;
use quiz_grader::models::question::AnswerKey;
use quiz_grader::pipeline::SubmissionPipeline;
use quiz_grader::pipeline::notifier::SmtpNotifier;
use quiz_grader::pipeline::recorder::PgSubmissionRecorder;
use quiz_grader::routes;
use quiz_grader::state::AppState;
use quiz_grader::utils::media::MediaResolver;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Load the answer key before touching any external service
    let answer_key = match &config.answer_key_path {
        Some(path) => AnswerKey::load(path)
            .unwrap_or_else(|e| panic!("Failed to load answer key from {}: {}", path, e)),
        None => AnswerKey::builtin(),
    };
    tracing::info!("Answer key loaded with {} questions", answer_key.len());

    let media = MediaResolver::new(&config.base_url)
        .unwrap_or_else(|e| panic!("BASE_URL {:?} is not a valid URL: {}", config.base_url, e));

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    let notifier = SmtpNotifier::new(&config.smtp_host, &config.mail_user, &config.mail_pass)
        .unwrap_or_else(|e| panic!("Failed to configure mail transport: {}", e));

    let pipeline = SubmissionPipeline::new(
        Arc::new(answer_key),
        Arc::new(PgSubmissionRecorder::new(pool)),
        Arc::new(notifier),
        media,
    );

    // Create AppState
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", addr, e));

    // Start the server
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
