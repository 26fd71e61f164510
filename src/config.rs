// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Subject line of every result email.
pub const REPORT_SUBJECT: &str = "Quiz Results";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// SMTP login. Also used as the sender address.
    pub mail_user: String,
    pub mail_pass: String,
    pub smtp_host: String,

    /// Public URL prefix that media references in reports are resolved against.
    pub base_url: String,

    /// Optional JSON answer key. The built-in key is used when unset.
    pub answer_key_path: Option<String>,

    /// Directory served under `/images`.
    pub static_dir: String,

    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let mail_user = env::var("MAIL_USER")
            .expect("MAIL_USER must be set");

        let mail_pass = env::var("MAIL_PASS")
            .expect("MAIL_PASS must be set");

        let smtp_host = env::var("SMTP_HOST")
            .unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let answer_key_path = env::var("ANSWER_KEY_PATH").ok();

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "public/images".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            mail_user,
            mail_pass,
            smtp_host,
            base_url,
            answer_key_path,
            static_dir,
            port,
            rust_log,
        }
    }
}
