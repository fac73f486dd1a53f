use std::sync::Arc;

use serde::Serialize;

use super::{Email, MailError, Mailer};
use crate::submission::ContactSubmission;
use crate::templates::Templates;

const SENT_MESSAGE: &str = "Email sent successfully";
const TEST_MODE_MESSAGE: &str = "Email logged in test mode (SMTP not configured)";

/// Body of a successful `POST /api/send-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_mode: Option<bool>,
}

/// Renders and sends the confirmation and notification emails for one submission.
#[derive(Clone)]
pub struct Dispatcher {
    /// `None` runs in test mode: nothing leaves the process.
    mailer: Option<Arc<dyn Mailer>>,
    templates: Templates,
    sender: String,
    recipient: String,
}

impl Dispatcher {
    pub fn new(
        mailer: Option<Arc<dyn Mailer>>,
        templates: Templates,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Dispatcher {
            mailer,
            templates,
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    pub fn is_test_mode(&self) -> bool {
        self.mailer.is_none()
    }

    /// Probes the injected mailer. `None` in test mode.
    pub async fn verify_transport(&self) -> Option<Result<bool, MailError>> {
        match &self.mailer {
            Some(mailer) => Some(mailer.verify().await),
            None => None,
        }
    }

    /// Sends the confirmation to the submitter, then the notification to the
    /// internal recipient. A failure of either send is returned as is; there is
    /// no partial success.
    pub async fn dispatch(&self, submission: &ContactSubmission) -> Result<DispatchResult, MailError> {
        tracing::info!(
            email = %submission.email,
            company = %submission.company,
            has_message = submission.message.is_some(),
            "dispatching contact submission"
        );

        let Some(mailer) = &self.mailer else {
            tracing::warn!(
                confirmation_to = %submission.email,
                notification_to = %self.recipient,
                "SMTP not configured, skipping send (test mode)"
            );
            return Ok(DispatchResult {
                success: true,
                message: TEST_MODE_MESSAGE.to_string(),
                test_mode: Some(true),
            });
        };

        let confirmation = Email::builder()
            .from(&self.sender)
            .to(&submission.email)
            .rendered(
                self.templates
                    .confirmation(submission.name.as_deref(), &submission.company)?,
            )
            .build()?;

        let notification = Email::builder()
            .from(&self.sender)
            .to(&self.recipient)
            .reply_to(&submission.email)
            .rendered(self.templates.notification(
                submission.name.as_deref(),
                &submission.email,
                &submission.company,
                submission.message.as_deref(),
            )?)
            .build()?;

        mailer.send(&confirmation).await?;
        mailer.send(&notification).await?;

        tracing::info!(email = %submission.email, "confirmation and notification sent");
        Ok(DispatchResult {
            success: true,
            message: SENT_MESSAGE.to_string(),
            test_mode: None,
        })
    }
}
