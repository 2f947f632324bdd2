//! CLI Commands

pub mod check;
pub mod config;
pub mod options;
pub mod submit;

use rfp_intake::FormController;
use std::path::{Path, PathBuf};

use crate::intake::Intake;

/// Open a fresh form and replay the intake document onto it.
pub async fn load_form<T>(
    transport: T,
    file: &Path,
    attach: &[PathBuf],
) -> Result<FormController<T>, String> {
    let intake = Intake::load(file)?;
    let mut form = FormController::new(transport);
    intake.apply(&mut form, attach).await?;
    tracing::debug!(
        file = %file.display(),
        inputs = intake.inputs.len(),
        files = form.files().len(),
        "intake loaded"
    );
    Ok(form)
}
