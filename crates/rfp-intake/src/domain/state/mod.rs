//! Form state
//!
//! Current value of every declared field. A fresh state is empty; it is
//! mutated one field at a time and discarded after a successful submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Field, FieldValue};
use crate::{FormError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub account_manager: String,
    pub email_address: String,
    pub client_name: String,
    pub date_of_proposal_submission: Option<NaiveDate>,
    pub estimate: String,
    pub location_of_project: String,
    pub type_of_project: String,
    pub event_date: Option<NaiveDate>,
    pub event_duration: Option<u32>,
    pub hardware_purchase: String,
    pub technical_support: String,
    pub presentation: String,
    pub presentation_type: String,
    pub presentation_type_others: String,
    pub sow: String,
    pub reference_links: Vec<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::AccountManager => FieldValue::Text(self.account_manager.clone()),
            Field::EmailAddress => FieldValue::Text(self.email_address.clone()),
            Field::ClientName => FieldValue::Text(self.client_name.clone()),
            Field::DateOfProposalSubmission => FieldValue::Date(self.date_of_proposal_submission),
            Field::Estimate => FieldValue::Text(self.estimate.clone()),
            Field::LocationOfProject => FieldValue::Text(self.location_of_project.clone()),
            Field::TypeOfProject => FieldValue::Text(self.type_of_project.clone()),
            Field::EventDate => FieldValue::Date(self.event_date),
            Field::EventDuration => FieldValue::Number(self.event_duration),
            Field::HardwarePurchase => FieldValue::Text(self.hardware_purchase.clone()),
            Field::TechnicalSupport => FieldValue::Text(self.technical_support.clone()),
            Field::Presentation => FieldValue::Text(self.presentation.clone()),
            Field::PresentationType => FieldValue::Text(self.presentation_type.clone()),
            Field::PresentationTypeOthers => FieldValue::Text(self.presentation_type_others.clone()),
            Field::Sow => FieldValue::Text(self.sow.clone()),
            Field::ReferenceLinks => FieldValue::List(self.reference_links.clone()),
        }
    }

    /// Return a new state with `field` replaced. `self` is left untouched.
    pub fn set_field(&self, field: Field, value: FieldValue) -> Result<FormState> {
        let mut next = self.clone();
        next.apply(field, value)?;
        Ok(next)
    }

    /// Replace `field` in place.
    pub fn apply(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::DateOfProposalSubmission, FieldValue::Date(d)) => self.date_of_proposal_submission = d,
            (Field::EventDate, FieldValue::Date(d)) => self.event_date = d,
            (Field::EventDuration, FieldValue::Number(n)) => self.event_duration = n,
            (Field::ReferenceLinks, FieldValue::List(links)) => self.reference_links = links,
            (field, FieldValue::Text(s)) => match self.text_mut(field) {
                Some(slot) => *slot = s,
                None => return Err(FormError::TypeMismatch { field, expected: field.kind() }),
            },
            (field, _) => {
                return Err(FormError::TypeMismatch { field, expected: field.kind() });
            }
        }
        Ok(())
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let slot = match field {
            Field::AccountManager => &mut self.account_manager,
            Field::EmailAddress => &mut self.email_address,
            Field::ClientName => &mut self.client_name,
            Field::Estimate => &mut self.estimate,
            Field::LocationOfProject => &mut self.location_of_project,
            Field::TypeOfProject => &mut self.type_of_project,
            Field::HardwarePurchase => &mut self.hardware_purchase,
            Field::TechnicalSupport => &mut self.technical_support,
            Field::Presentation => &mut self.presentation,
            Field::PresentationType => &mut self.presentation_type,
            Field::PresentationTypeOthers => &mut self.presentation_type_others,
            Field::Sow => &mut self.sow,
            Field::DateOfProposalSubmission
            | Field::EventDate
            | Field::EventDuration
            | Field::ReferenceLinks => return None,
        };
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn test_new_state_is_empty() {
        let state = FormState::new();
        for field in Field::ALL {
            assert_eq!(state.get(field).to_wire_string(), "", "{field}");
        }
    }

    #[test]
    fn test_set_field_returns_new_state() {
        let original = FormState::new();
        let next = original.set_field(Field::ClientName, FieldValue::text("Acme")).unwrap();
        assert_eq!(next.client_name, "Acme");
        assert!(original.client_name.is_empty());
    }

    #[test]
    fn test_set_every_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let state = FormState::new()
            .set_field(Field::EventDate, FieldValue::date(date))
            .and_then(|s| s.set_field(Field::EventDuration, FieldValue::number(2)))
            .and_then(|s| s.set_field(Field::ReferenceLinks, FieldValue::list(["http://example.com"])))
            .and_then(|s| s.set_field(Field::PresentationTypeOthers, FieldValue::text("Live demo")))
            .unwrap();

        assert_eq!(state.get(Field::EventDate), FieldValue::Date(Some(date)));
        assert_eq!(state.event_duration, Some(2));
        assert_eq!(state.reference_links, vec!["http://example.com".to_string()]);
        assert_eq!(state.presentation_type_others, "Live demo");
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let mut state = FormState::new();
        let err = state.apply(Field::EventDuration, FieldValue::text("three")).unwrap_err();
        assert!(matches!(
            err,
            FormError::TypeMismatch { field: Field::EventDuration, expected: ValueKind::Number }
        ));

        let err = state.apply(Field::ClientName, FieldValue::number(1)).unwrap_err();
        assert!(matches!(err, FormError::TypeMismatch { expected: ValueKind::Text, .. }));
        assert_eq!(state, FormState::new());
    }
}
