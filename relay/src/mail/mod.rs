//! Outbound email: message type, SMTP mailer, and the dispatch orchestrator.
//!
//! The SMTP transport is only built when host, user and password are all
//! configured (see [`Config::smtp`](crate::config::Config::smtp)); otherwise
//! [`Dispatcher`] runs in test mode and logs instead of sending.

mod dispatch;
mod mailer;
mod message;

pub use dispatch::{DispatchResult, Dispatcher};
pub use mailer::{Mailer, SmtpMailer};
pub use message::{Email, EmailBuilder};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to render template: {0}")]
    Template(#[from] askama::Error),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
