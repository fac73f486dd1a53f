//! Mailer trait and SMTP implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Email, MailError};
use crate::config::SmtpSettings;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Async email sending.
///
/// [`SmtpMailer`] is the production implementation; tests substitute a
/// recording mailer.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &Email) -> Result<(), MailError>;

    /// Checks that the transport can reach its server.
    async fn verify(&self) -> Result<bool, MailError> {
        Ok(true)
    }
}

/// SMTP mailer built on lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MailError::Smtp(e.to_string()))?;

        let transport = builder
            .port(settings.port)
            .timeout(Some(SMTP_TIMEOUT))
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport: Arc::new(transport),
        })
    }

    /// Verifies the server is reachable and accepts the credentials.
    pub async fn test_connection(&self) -> Result<bool, MailError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

pub(crate) fn build_message(email: &Email) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&email.from)?)
        .to(mailbox(&email.to)?)
        .subject(&email.subject);

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(mailbox(reply_to)?);
    }

    builder
        .singlepart(SinglePart::html(email.html.clone()))
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let message = build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        tracing::info!(
            to = %email.to,
            code = %response.code(),
            "smtp accepted message"
        );
        Ok(())
    }

    async fn verify(&self) -> Result<bool, MailError> {
        self.test_connection().await
    }
}
