//! Outbound email type and builder.

use super::MailError;
use crate::templates::RenderedEmail;

/// A complete HTML email ready to hand to a [`Mailer`](super::Mailer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Sender, either `addr@host` or `"Name" <addr@host>`.
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

impl Email {
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }
}

/// Builder for [`Email`]. `build` fails when sender, recipient, subject or body is missing.
#[derive(Debug, Default)]
pub struct EmailBuilder {
    from: Option<String>,
    to: Option<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    html: Option<String>,
}

impl EmailBuilder {
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = Some(address.into());
        self
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Takes subject and body from a rendered template.
    pub fn rendered(self, rendered: RenderedEmail) -> Self {
        self.subject(rendered.subject).html(rendered.html)
    }

    pub fn build(self) -> Result<Email, MailError> {
        let from = self
            .from
            .ok_or_else(|| MailError::Build("from address required".into()))?;

        let to = self
            .to
            .ok_or_else(|| MailError::Build("at least one recipient required".into()))?;

        let subject = self
            .subject
            .ok_or_else(|| MailError::Build("subject required".into()))?;

        let html = self
            .html
            .ok_or_else(|| MailError::Build("html body required".into()))?;

        Ok(Email {
            from,
            to,
            reply_to: self.reply_to,
            subject,
            html,
        })
    }
}
