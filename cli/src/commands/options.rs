//! Options command

use rfp_intake::Field;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{OutputFormat, TableView};

#[derive(Debug, Serialize)]
pub struct FieldOptions {
    pub field: Field,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

#[derive(Tabled)]
pub struct OptionRow {
    field: &'static str,
    label: &'static str,
    options: String,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct OptionList(Vec<FieldOptions>);

impl TableView for OptionList {
    type Row = OptionRow;

    fn rows(&self) -> Vec<OptionRow> {
        self.0
            .iter()
            .map(|o| OptionRow { field: o.field.as_str(), label: o.label, options: o.options.join(" | ") })
            .collect()
    }
}

pub fn list(field: Option<&str>) -> Result<OptionList, String> {
    let fields = match field {
        Some(name) => {
            let field: Field = name.parse().map_err(|e: rfp_intake::FormError| e.to_string())?;
            if field.options().is_empty() {
                return Err(format!("{} is a free-form field", field));
            }
            vec![field]
        }
        None => Field::ALL.into_iter().filter(|f| !f.options().is_empty()).collect(),
    };
    Ok(OptionList(
        fields
            .into_iter()
            .map(|field| FieldOptions { field, label: field.label(), options: field.options() })
            .collect(),
    ))
}

pub fn handle(field: Option<&str>, format: OutputFormat) -> Result<(), String> {
    format.print(&list(field)?);
    Ok(())
}
