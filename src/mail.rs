use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ContactConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected message with status {0}")]
    Rejected(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = ?message.to,
            reply_to = message.reply_to.as_deref().unwrap_or(""),
            subject = %message.subject,
            "mail not delivered (no relay configured)"
        );
        Ok(())
    }
}

/// Posts messages as JSON to an HTTP mail relay.
pub struct HttpRelayMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelayMailer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let response = self.client.post(&self.endpoint).json(message).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "mail relay rejected message");
            return Err(MailError::Rejected(status.as_u16()));
        }
        tracing::debug!(subject = %message.subject, "mail relayed");
        Ok(())
    }
}

/// Relay when one is configured, log-only otherwise.
pub fn from_config(config: &ContactConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.mail_relay_url.as_deref() {
        Some(url) => Ok(Arc::new(HttpRelayMailer::new(url)?)),
        None => Ok(Arc::new(LogMailer)),
    }
}
