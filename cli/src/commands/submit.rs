//! Submit command

use rfp_intake::{EndpointConfig, SendEmailClient, SubmissionError, SubmissionReceipt, ValidationReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::Tabled;

use super::load_form;
use crate::output::{OutputFormat, TableView};

#[derive(Tabled)]
pub struct ErrorRow {
    field: &'static str,
    label: &'static str,
    error: &'static str,
}

#[derive(Serialize)]
pub struct InvalidFields<'a>(&'a ValidationReport);

impl TableView for InvalidFields<'_> {
    type Row = ErrorRow;

    fn rows(&self) -> Vec<ErrorRow> {
        self.0
            .errors
            .iter()
            .map(|(field, error)| ErrorRow {
                field: field.as_str(),
                label: field.label(),
                error: *error,
            })
            .collect()
    }
}

#[derive(Tabled)]
pub struct ReceiptRow {
    notification: String,
    status: u16,
    submitted_at: String,
}

#[derive(Serialize)]
pub struct Receipt<'a>(&'a SubmissionReceipt);

impl TableView for Receipt<'_> {
    type Row = ReceiptRow;

    fn rows(&self) -> Vec<ReceiptRow> {
        vec![ReceiptRow {
            notification: self.0.notification_id.to_string(),
            status: self.0.status,
            submitted_at: self.0.submitted_at.to_rfc3339(),
        }]
    }
}

pub async fn handle(
    file: &Path,
    attach: &[PathBuf],
    endpoint: &EndpointConfig,
    format: OutputFormat,
) -> Result<(), String> {
    let client = SendEmailClient::new(endpoint);
    tracing::info!(endpoint = client.endpoint(), deployment = %endpoint.deployment, "submitting intake");
    let mut form = load_form(client, file, attach).await?;

    let result = form.submit_with(|notification| format.notify(notification)).await;

    match result {
        Ok(receipt) => {
            format.print(&Receipt(&receipt));
            Ok(())
        }
        Err(SubmissionError::Invalid(report)) => {
            format.print(&InvalidFields(&report));
            Err(format!("form has {} invalid field(s)", report.len()))
        }
        Err(SubmissionError::Transport(e)) => Err(e.to_string()),
    }
}
