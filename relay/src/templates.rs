//! Confirmation and notification email bodies.
//!
//! Every user supplied value goes through [`escape`] before it reaches a
//! template, so the templates themselves are compiled with auto-escaping off.

use askama::Template;

use crate::escape::{escape, escape_html};

const GREETING_FALLBACK: &str = "there";
const NAME_FALLBACK: &str = "Not provided";
const MESSAGE_FALLBACK: &str = "No message provided";

pub const CONFIRMATION_SUBJECT: &str = "Thank you for contacting us";

/// Subject and HTML body of one outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

#[derive(Template)]
#[template(path = "confirmation.html", escape = "none")]
struct ConfirmationTemplate<'a> {
    subject: &'a str,
    brand: &'a str,
    name: &'a str,
    company: &'a str,
}

#[derive(Template)]
#[template(path = "notification.html", escape = "none")]
struct NotificationTemplate<'a> {
    subject: &'a str,
    brand: &'a str,
    name: &'a str,
    email: &'a str,
    company: &'a str,
    message: &'a str,
}

/// Renders both emails with the sender's branding.
#[derive(Debug, Clone)]
pub struct Templates {
    brand: String,
}

impl Templates {
    pub fn new(brand: &str) -> Self {
        Templates {
            brand: escape(brand),
        }
    }

    /// "Thank you" email sent to the submitter.
    pub fn confirmation(
        &self,
        name: Option<&str>,
        company: &str,
    ) -> Result<RenderedEmail, askama::Error> {
        let name = or_fallback(escape_html(name), GREETING_FALLBACK);
        let company = escape(company);

        let html = ConfirmationTemplate {
            subject: CONFIRMATION_SUBJECT,
            brand: &self.brand,
            name: &name,
            company: &company,
        }
        .render()?;

        Ok(RenderedEmail {
            subject: CONFIRMATION_SUBJECT.to_string(),
            html,
        })
    }

    /// "New lead" email sent to the internal mailbox.
    pub fn notification(
        &self,
        name: Option<&str>,
        email: &str,
        company: &str,
        message: Option<&str>,
    ) -> Result<RenderedEmail, askama::Error> {
        let name = or_fallback(escape_html(name), NAME_FALLBACK);
        let email = escape(email);
        let company = escape(company);
        let message = or_fallback(escape_html(message), MESSAGE_FALLBACK).replace('\n', "<br>");
        let subject = format!("New Contact Form Submission from {company}");

        let html = NotificationTemplate {
            subject: &subject,
            brand: &self.brand,
            name: &name,
            email: &email,
            company: &company,
            message: &message,
        }
        .render()?;

        Ok(RenderedEmail { subject, html })
    }
}

impl Default for Templates {
    fn default() -> Self {
        Templates::new("Contact Relay")
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
