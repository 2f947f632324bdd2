//! Field rules
//!
//! One row per declared field: which sibling fields it reads, when it is
//! visible and when it is valid. Visibility and validity are never stored;
//! both are derived from the full [`FormState`] on demand.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::domain::state::FormState;
use crate::domain::value_objects::{Field, OTHERS, RENTAL_EVENT, YES};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Field should contain a valid email";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+$").expect("email pattern compiles"));

pub struct FieldRule {
    pub field: Field,
    /// Sibling fields the predicates read.
    pub depends_on: &'static [Field],
    pub message: &'static str,
    visible: fn(&FormState) -> bool,
    valid: fn(&FormState) -> bool,
}

impl FieldRule {
    pub fn is_visible(&self, state: &FormState) -> bool {
        (self.visible)(state)
    }

    pub fn is_valid(&self, state: &FormState) -> bool {
        (self.valid)(state)
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("depends_on", &self.depends_on)
            .finish()
    }
}

// =============================================================================
// Predicates
// =============================================================================

fn always(_: &FormState) -> bool {
    true
}

fn is_rental_event(s: &FormState) -> bool {
    s.type_of_project == RENTAL_EVENT
}

fn wants_presentation(s: &FormState) -> bool {
    s.presentation == YES
}

fn presentation_is_other(s: &FormState) -> bool {
    s.presentation_type == OTHERS
}

fn account_manager(s: &FormState) -> bool {
    !s.account_manager.is_empty()
}

fn email_address(s: &FormState) -> bool {
    EMAIL_PATTERN.is_match(&s.email_address)
}

fn client_name(s: &FormState) -> bool {
    !s.client_name.is_empty()
}

fn date_of_proposal_submission(s: &FormState) -> bool {
    s.date_of_proposal_submission.is_some()
}

fn estimate(s: &FormState) -> bool {
    !s.estimate.is_empty()
}

fn location_of_project(s: &FormState) -> bool {
    !s.location_of_project.is_empty()
}

fn type_of_project(s: &FormState) -> bool {
    !s.type_of_project.is_empty()
}

fn event_date(s: &FormState) -> bool {
    !is_rental_event(s) || s.event_date.is_some()
}

fn event_duration(s: &FormState) -> bool {
    !is_rental_event(s) || matches!(s.event_duration, Some(days) if days >= 1)
}

fn hardware_purchase(s: &FormState) -> bool {
    !s.hardware_purchase.is_empty()
}

fn technical_support(s: &FormState) -> bool {
    !s.technical_support.is_empty()
}

fn presentation(s: &FormState) -> bool {
    !s.presentation.is_empty()
}

fn presentation_type(s: &FormState) -> bool {
    !wants_presentation(s) || !s.presentation_type.is_empty()
}

fn presentation_type_others(s: &FormState) -> bool {
    !presentation_is_other(s) || !s.presentation_type_others.is_empty()
}

fn sow(s: &FormState) -> bool {
    !s.sow.is_empty()
}

fn reference_links(s: &FormState) -> bool {
    !s.reference_links.is_empty()
}

// =============================================================================
// Rule Table
// =============================================================================

const fn independent(field: Field, valid: fn(&FormState) -> bool) -> FieldRule {
    FieldRule { field, depends_on: &[], message: REQUIRED_MESSAGE, visible: always, valid }
}

/// Rows are in [`Field::ALL`] order.
pub static RULES: [FieldRule; 16] = [
    independent(Field::AccountManager, account_manager),
    FieldRule {
        field: Field::EmailAddress,
        depends_on: &[],
        message: EMAIL_MESSAGE,
        visible: always,
        valid: email_address,
    },
    independent(Field::ClientName, client_name),
    independent(Field::DateOfProposalSubmission, date_of_proposal_submission),
    independent(Field::Estimate, estimate),
    independent(Field::LocationOfProject, location_of_project),
    independent(Field::TypeOfProject, type_of_project),
    FieldRule {
        field: Field::EventDate,
        depends_on: &[Field::TypeOfProject],
        message: REQUIRED_MESSAGE,
        visible: is_rental_event,
        valid: event_date,
    },
    FieldRule {
        field: Field::EventDuration,
        depends_on: &[Field::TypeOfProject],
        message: REQUIRED_MESSAGE,
        visible: is_rental_event,
        valid: event_duration,
    },
    independent(Field::HardwarePurchase, hardware_purchase),
    independent(Field::TechnicalSupport, technical_support),
    independent(Field::Presentation, presentation),
    FieldRule {
        field: Field::PresentationType,
        depends_on: &[Field::Presentation],
        message: REQUIRED_MESSAGE,
        visible: wants_presentation,
        valid: presentation_type,
    },
    FieldRule {
        field: Field::PresentationTypeOthers,
        depends_on: &[Field::PresentationType],
        message: REQUIRED_MESSAGE,
        visible: presentation_is_other,
        valid: presentation_type_others,
    },
    independent(Field::Sow, sow),
    independent(Field::ReferenceLinks, reference_links),
];

pub fn rule(field: Field) -> &'static FieldRule {
    &RULES[field as usize]
}

/// Fields whose rule reads `field`.
pub fn dependents(field: Field) -> impl Iterator<Item = Field> {
    RULES
        .iter()
        .filter(move |rule| rule.depends_on.contains(&field))
        .map(|rule| rule.field)
}

pub fn validate(field: Field, state: &FormState) -> bool {
    rule(field).is_valid(state)
}

pub fn visibility(field: Field, state: &FormState) -> bool {
    rule(field).is_visible(state)
}

pub fn validate_all(state: &FormState) -> ValidationReport {
    let errors = RULES
        .iter()
        .filter(|rule| !rule.is_valid(state))
        .map(|rule| (rule.field, rule.message))
        .collect();
    ValidationReport { errors }
}

pub fn can_submit(state: &FormState) -> bool {
    RULES.iter().all(|rule| rule.is_valid(state))
}

// =============================================================================
// Validation Report
// =============================================================================

/// Failing fields with the message shown next to each.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<Field, &'static str>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }
}
