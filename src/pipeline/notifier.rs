// src/pipeline/notifier.rs

use std::fmt;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::report::ReportDocument;

/// Mail delivery failures. A single attempt is made per submission.
#[derive(Debug)]
pub enum DeliveryError {
    InvalidRecipient(String),
    Message(String),
    Transport(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::InvalidRecipient(msg) => write!(f, "invalid recipient: {}", msg),
            DeliveryError::Message(msg) => write!(f, "failed to build message: {}", msg),
            DeliveryError::Transport(msg) => write!(f, "mail transport failed: {}", msg),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Outbound channel for result reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, report: &ReportDocument) -> Result<(), DeliveryError>;
}

/// Sends reports as HTML mail through an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Builds a STARTTLS transport for `host`. `user` doubles as the sender address.
    pub fn new(host: &str, user: &str, pass: &str) -> Result<Self, DeliveryError> {
        let from = user
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::Message(format!("bad sender {:?}: {}", user, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .credentials(Credentials::new(user.to_owned(), pass.to_owned()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, recipient: &str, report: &ReportDocument) -> Result<(), DeliveryError> {
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::InvalidRecipient(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(report.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(report.html.clone())
            .map_err(|e| DeliveryError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(())
    }
}
