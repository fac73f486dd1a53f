//! Inbound contact form payload and its validation.

use std::fmt;
use std::sync::OnceLock;

use lettre::message::Mailbox;
use regex::Regex;
use serde_json::{Map, Value};

const NAME_MAX: usize = 100;
const COMPANY_MAX: usize = 100;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MAX: usize = 5000;

/// A validated submission. `email` and `company` are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: String,
    pub company: String,
    /// Accepted for compatibility with the form, not used by the templates.
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failed rule of one payload, displayed comma separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Basic `local@domain.tld` shape that the SMTP mailbox parser also accepts
/// as a bare address.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
        && email
            .parse::<Mailbox>()
            .is_ok_and(|mailbox| mailbox.name.is_none() && mailbox.email.to_string() == email)
}

impl ContactSubmission {
    /// Validates an arbitrary JSON body. All failures are collected.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let Some(object) = body.as_object() else {
            return Err(ValidationErrors(vec![FieldError {
                field: "body",
                message: "Request body must be a JSON object".to_string(),
            }]));
        };

        let mut errors = Vec::new();

        let name = optional_string(object, "name", "Name", NAME_MAX, &mut errors);
        let subject = optional_string(object, "subject", "Subject", SUBJECT_MAX, &mut errors);
        let message = optional_string(object, "message", "Message", MESSAGE_MAX, &mut errors);

        let email = match object.get("email") {
            Some(Value::String(s)) if is_valid_email(s.trim()) => Some(s.trim().to_string()),
            _ => {
                errors.push(FieldError {
                    field: "email",
                    message: "Valid email is required".to_string(),
                });
                None
            }
        };

        let company = match object.get("company") {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                let company = s.trim();
                if company.chars().count() > COMPANY_MAX {
                    errors.push(too_long("company", "Company", COMPANY_MAX));
                    None
                } else {
                    Some(company.to_string())
                }
            }
            _ => {
                errors.push(FieldError {
                    field: "company",
                    message: "Company is required".to_string(),
                });
                None
            }
        };

        match (email, company) {
            (Some(email), Some(company)) if errors.is_empty() => Ok(ContactSubmission {
                name,
                email,
                company,
                subject,
                message,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Absent, `null` and blank values all yield `None`.
fn optional_string(
    object: &Map<String, Value>,
    key: &'static str,
    label: &str,
    max: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.chars().count() > max {
                errors.push(too_long(key, label, max));
                None
            } else if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Some(_) => {
            errors.push(FieldError {
                field: key,
                message: format!("{label} must be a string"),
            });
            None
        }
    }
}

fn too_long(field: &'static str, label: &str, max: usize) -> FieldError {
    FieldError {
        field,
        message: format!("{label} must be at most {max} characters"),
    }
}
