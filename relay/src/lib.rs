pub use relay_macros::HttpError;

pub mod config;
pub mod error;
pub mod escape;
pub mod mail;
pub mod rate_limit;
pub mod routes;
pub mod serve;
pub mod submission;
pub mod templates;

use std::sync::Arc;

use lettre::message::Mailbox;
use lettre::Address;

pub use crate::config::{Config, EnvConfig};
pub use error::{Error, Result};
pub use routes::{router, AppState};
pub use serve::serve;

use mail::{Dispatcher, MailError, Mailer, SmtpMailer};
use rate_limit::RateLimit;
use templates::Templates;

/// Builds the shared state from process configuration.
///
/// Without complete SMTP settings the dispatcher runs in test mode. The
/// sender is `SMTP_FROM_NAME <SMTP_USER>`.
pub fn build_state(config: &Config) -> std::result::Result<AppState, MailError> {
    let (mailer, sender) = match config.smtp() {
        Some(smtp) => {
            let address: Address = smtp
                .user
                .parse()
                .map_err(|_| MailError::InvalidAddress(smtp.user.clone()))?;
            let sender = Mailbox::new(Some(config.smtp_from_name.clone()), address);
            let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&smtp)?);
            (Some(mailer), sender.to_string())
        }
        None => (None, config.smtp_from_name.clone()),
    };

    let dispatcher = Dispatcher::new(
        mailer,
        Templates::new(&config.smtp_from_name),
        sender,
        config.contact_recipient.clone(),
    );
    let rate_limit = RateLimit::new(
        config.rate_limit_max,
        config.rate_limit_window(),
        config.trust_proxy,
    );

    Ok(AppState::new(dispatcher, rate_limit))
}
