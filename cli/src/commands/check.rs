//! Check command

use rfp_intake::{Attachment, Field, FormController};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::Tabled;

use super::load_form;
use crate::output::{OutputFormat, TableView};

#[derive(Debug, Serialize)]
pub struct FieldStatus {
    pub field: Field,
    pub label: &'static str,
    pub visible: bool,
    pub valid: bool,
    pub value: String,
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub can_submit: bool,
    pub fields: Vec<FieldStatus>,
    pub files: Vec<Attachment>,
}

#[derive(Tabled)]
pub struct FieldRow {
    field: &'static str,
    shown: &'static str,
    valid: &'static str,
    value: String,
    error: &'static str,
}

impl CheckReport {
    /// Mark every field the way a submit attempt would, without sending.
    pub fn from_form<T>(form: &mut FormController<T>) -> Self {
        let report = form.validate();
        let fields = Field::ALL
            .into_iter()
            .map(|field| FieldStatus {
                field,
                label: field.label(),
                visible: form.is_visible(field),
                valid: form.is_valid(field),
                value: form.state().get(field).to_wire_string(),
                error: form.error(field),
            })
            .collect();
        Self { can_submit: report.is_valid(), fields, files: form.files().to_vec() }
    }

    pub fn invalid_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.valid).count()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl TableView for CheckReport {
    type Row = FieldRow;

    fn rows(&self) -> Vec<FieldRow> {
        self.fields
            .iter()
            .map(|f| FieldRow {
                field: f.field.as_str(),
                shown: yes_no(f.visible),
                valid: yes_no(f.valid),
                value: f.value.clone(),
                error: f.error.unwrap_or(""),
            })
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.files.iter().map(|f| format!("file: {}", f.display_label())).collect();
        if self.can_submit {
            lines.push("Ready to submit".to_string());
        } else {
            lines.push(format!("{} field(s) need attention", self.invalid_count()));
        }
        lines
    }
}

pub async fn handle(file: &Path, attach: &[PathBuf], format: OutputFormat) -> Result<(), String> {
    let mut form = load_form((), file, attach).await?;
    let report = CheckReport::from_form(&mut form);
    format.print(&report);

    if report.can_submit {
        Ok(())
    } else {
        Err(format!("form has {} invalid field(s)", report.invalid_count()))
    }
}
