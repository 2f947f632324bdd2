//! Submission payload
//!
//! One text entry per declared field, followed by one `files` entry per
//! attachment. Built from a snapshot so the live state stays untouched if
//! the request fails.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::domain::state::FormState;
use crate::domain::value_objects::{Attachment, Field};

pub const FILES_FIELD: &str = "files";
const FILE_MIME: &str = "application/octet-stream";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadEntry {
    Text { name: &'static str, value: String },
    File { file_name: String, content: Bytes },
}

impl PayloadEntry {
    pub fn name(&self) -> &'static str {
        match self {
            PayloadEntry::Text { name, .. } => *name,
            PayloadEntry::File { .. } => FILES_FIELD,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    entries: Vec<PayloadEntry>,
}

impl SubmissionPayload {
    pub fn build(state: &FormState, files: &[Attachment]) -> Self {
        let mut entries = Vec::with_capacity(Field::ALL.len() + files.len());
        for field in Field::ALL {
            entries.push(PayloadEntry::Text {
                name: field.as_str(),
                value: state.get(field).to_wire_string(),
            });
        }
        for file in files {
            entries.push(PayloadEntry::File {
                file_name: file.name.clone(),
                content: file.content.clone(),
            });
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[PayloadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, PayloadEntry::File { .. }))
            .count()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            PayloadEntry::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Encode as `multipart/form-data`.
    pub fn into_multipart(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for entry in self.entries {
            form = match entry {
                PayloadEntry::Text { name, value } => form.text(name, value),
                PayloadEntry::File { file_name, content } => {
                    let part = Part::bytes(content.to_vec())
                        .file_name(file_name)
                        .mime_str(FILE_MIME)?;
                    form.part(FILES_FIELD, part)
                }
            };
        }
        Ok(form)
    }
}
