//! RFP Intake
//!
//! Request for Proposal intake form: collects business intake data,
//! validates it field by field and submits it, together with the selected
//! attachments, to the email-sending endpoint.
//!
//! ## Features
//! - Typed form state with one rule per field
//! - Conditional fields (rental/event details, presentation type)
//! - Reference links and file attachments
//! - Multipart submission with a progress notification
//!
//! ```no_run
//! use rfp_intake::{Deployment, EndpointConfig, Field, FieldValue, FormController, SendEmailClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EndpointConfig::from_env(Deployment::Development)?;
//! let mut form = FormController::new(SendEmailClient::new(&config));
//! form.set_field(Field::ClientName, FieldValue::text("Acme"))?;
//! form.submit().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod payload;
pub mod transport;

pub use config::{Deployment, EndpointConfig, API_URL_ENV};
pub use domain::aggregates::{FormController, Notification, NotificationKind, SubmissionReceipt, SubmissionStatus};
pub use domain::events::FormEvent;
pub use domain::rules::{can_submit, dependents, rule, validate, validate_all, visibility, FieldRule, ValidationReport, RULES};
pub use domain::state::FormState;
pub use domain::value_objects::{Attachment, Field, FieldValue, ValueKind};
pub use payload::{PayloadEntry, SubmissionPayload};
pub use transport::{SendEmailClient, Transport, TransportError, TransportResponse};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} expects a {expected} value")]
    TypeMismatch { field: Field, expected: ValueKind },

    #[error("Attachment error: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(ValidationReport),

    #[error("Submission failed: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, FormError>;
