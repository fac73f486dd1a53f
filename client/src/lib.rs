//! Client for the contact relay's `POST /api/send-email`.
//!
//! ```ignore
//! let payload = ContactPayload::new("jane@acme.test", "Acme");
//! let response = submit_contact("http://localhost:3001", &payload, RequestOverrides::default()).await?;
//! ```

pub mod bench;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{submit_contact, SubmissionClient};
pub use config::{RequestConfig, RequestOverrides};
pub use error::{ErrorKind, SubmitError};
pub use transport::{ContactPayload, HttpTransport, SubmitResponse, Transport};
