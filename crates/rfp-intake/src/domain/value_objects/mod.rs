//! Intake form value objects

use bytes::Bytes;
use bytesize::ByteSize;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::FormError;

// =============================================================================
// Choice Lists
// =============================================================================

pub const ACCOUNT_MANAGERS: &[&str] = &["Sophiya", "Ziad", "Christine", "Sharme", "Aditya", "Other"];
pub const ESTIMATE_TYPES: &[&str] = &["Actual", "Range", "Indicative"];
pub const RENTAL_EVENT: &str = "Rental/Event";
pub const PROJECT_TYPES: &[&str] = &["Permanent", RENTAL_EVENT, "Additional to a previous scope/project"];
pub const HARDWARE_OPTIONS: &[&str] = &["Purchase", "Rental", "No Hardware Required"];
pub const SUPPORT_OPTIONS: &[&str] = &["Required", "Not required"];
pub const YES: &str = "Yes";
pub const YES_NO: &[&str] = &[YES, "No"];
pub const OTHERS: &str = "Others";
pub const PRESENTATION_TYPES: &[&str] = &["Technical Presentation", "Design Presentation", "UI Flow", OTHERS];

// =============================================================================
// Fields
// =============================================================================

/// Declared form fields, in the order they are presented and submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    AccountManager,
    EmailAddress,
    ClientName,
    DateOfProposalSubmission,
    Estimate,
    LocationOfProject,
    TypeOfProject,
    EventDate,
    EventDuration,
    HardwarePurchase,
    TechnicalSupport,
    Presentation,
    PresentationType,
    PresentationTypeOthers,
    Sow,
    ReferenceLinks,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::AccountManager,
        Field::EmailAddress,
        Field::ClientName,
        Field::DateOfProposalSubmission,
        Field::Estimate,
        Field::LocationOfProject,
        Field::TypeOfProject,
        Field::EventDate,
        Field::EventDuration,
        Field::HardwarePurchase,
        Field::TechnicalSupport,
        Field::Presentation,
        Field::PresentationType,
        Field::PresentationTypeOthers,
        Field::Sow,
        Field::ReferenceLinks,
    ];

    /// Wire name, used both in intake documents and in the multipart body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::AccountManager => "accountManager",
            Field::EmailAddress => "emailAddress",
            Field::ClientName => "clientName",
            Field::DateOfProposalSubmission => "dateOfProposalSubmission",
            Field::Estimate => "estimate",
            Field::LocationOfProject => "locationOfProject",
            Field::TypeOfProject => "typeOfProject",
            Field::EventDate => "eventDate",
            Field::EventDuration => "eventDuration",
            Field::HardwarePurchase => "hardwarePurchase",
            Field::TechnicalSupport => "technicalSupport",
            Field::Presentation => "presentation",
            Field::PresentationType => "presentationType",
            Field::PresentationTypeOthers => "presentationTypeOthers",
            Field::Sow => "sow",
            Field::ReferenceLinks => "referenceLinks",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::AccountManager => "Account Manager",
            Field::EmailAddress => "Email ID",
            Field::ClientName => "Client Name",
            Field::DateOfProposalSubmission => "Date of Proposal Submission",
            Field::Estimate => "Estimate Type",
            Field::LocationOfProject => "Venue / Location of the Project",
            Field::TypeOfProject => "Type of Project",
            Field::EventDate => "Event Date",
            Field::EventDuration => "Event Duration (days)",
            Field::HardwarePurchase => "Hardware Requirement",
            Field::TechnicalSupport => "Technical Support",
            Field::Presentation => "Presentation Required",
            Field::PresentationType => "Presentation Type",
            Field::PresentationTypeOthers => "Enter Presentation Type",
            Field::Sow => "Scope Of Work",
            Field::ReferenceLinks => "Reference Links",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Field::DateOfProposalSubmission | Field::EventDate => ValueKind::Date,
            Field::EventDuration => ValueKind::Number,
            Field::ReferenceLinks => ValueKind::List,
            _ => ValueKind::Text,
        }
    }

    /// Suggested choices. Empty for free-form fields; free text is still
    /// accepted for choice fields.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Field::AccountManager => ACCOUNT_MANAGERS,
            Field::Estimate => ESTIMATE_TYPES,
            Field::TypeOfProject => PROJECT_TYPES,
            Field::HardwarePurchase => HARDWARE_OPTIONS,
            Field::TechnicalSupport => SUPPORT_OPTIONS,
            Field::Presentation => YES_NO,
            Field::PresentationType => PRESENTATION_TYPES,
            _ => &[],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

// =============================================================================
// Values
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Date,
    Number,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Date => "date",
            ValueKind::Number => "number",
            ValueKind::List => "list",
        };
        f.write_str(name)
    }
}

/// A single input event's value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Date(Option<NaiveDate>),
    Number(Option<u32>),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn date(value: NaiveDate) -> Self {
        FieldValue::Date(Some(value))
    }

    pub fn number(value: u32) -> Self {
        FieldValue::Number(Some(value))
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Date(_) => ValueKind::Date,
            FieldValue::Number(_) => ValueKind::Number,
            FieldValue::List(_) => ValueKind::List,
        }
    }

    /// String form sent over the wire. Absent dates and numbers become an
    /// empty string; lists are comma-joined.
    pub fn to_wire_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Number(Some(n)) => n.to_string(),
            FieldValue::Date(None) | FieldValue::Number(None) => String::new(),
            FieldValue::List(items) => items.join(","),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

// =============================================================================
// Attachments
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    #[serde(skip)]
    pub content: Bytes,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self { name: name.into(), size: content.len() as u64, content }
    }

    /// Read a file from disk, keeping only its file name.
    pub async fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                FormError::Attachment(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} is not a file path", path.display()),
                ))
            })?;
        let content = tokio::fs::read(path).await?;
        Ok(Self::new(name, content))
    }

    /// `name(size)` as shown next to a selected file, size in binary units.
    pub fn display_label(&self) -> String {
        format!("{}({})", self.name, ByteSize(self.size).to_string_as(true))
    }
}
