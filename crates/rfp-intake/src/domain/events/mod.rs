//! Form events
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::Field;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    FieldChanged { field: Field },
    SubmissionStarted { notification_id: Uuid },
    SubmissionSucceeded { notification_id: Uuid, status: u16 },
    SubmissionFailed { notification_id: Uuid, error: String },
    FormReset,
}
