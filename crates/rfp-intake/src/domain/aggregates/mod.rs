//! Form Aggregate
//!
//! [`FormController`] owns the form state, the transient reference-link
//! options and file selection, and the submission lifecycle:
//!
//! ```text
//! idle -> submitting -> success   (state discarded, fresh form)
//!                    -> failure   (state kept, may re-submit)
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::events::FormEvent;
use crate::domain::rules::{self, ValidationReport};
use crate::domain::state::FormState;
use crate::domain::value_objects::{Attachment, Field, FieldValue};
use crate::payload::SubmissionPayload;
use crate::transport::Transport;
use crate::{Result, SubmissionError};

// =============================================================================
// Submission Lifecycle
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting { notification_id: Uuid },
    Success { receipt: SubmissionReceipt },
    Failure { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub notification_id: Uuid,
    pub status: u16,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Loading,
    Success,
    Failure,
}

/// Progress indicator for a submission. Follow-up updates keep the id of the
/// loading notification they replace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: &'static str,
    pub message: &'static str,
    pub auto_close: bool,
    pub closable: bool,
}

impl Notification {
    pub fn loading() -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NotificationKind::Loading,
            title: "Submitting your Form",
            message: "Please wait while we submit your form",
            auto_close: false,
            closable: false,
        }
    }

    pub fn success(id: Uuid) -> Self {
        Self {
            id,
            kind: NotificationKind::Success,
            title: "Form Submitted",
            message: "Your form has been submitted successfully",
            auto_close: true,
            closable: true,
        }
    }

    pub fn failure(id: Uuid) -> Self {
        Self {
            id,
            kind: NotificationKind::Failure,
            title: "Form Submission Failed",
            message: "Your form submission failed",
            auto_close: true,
            closable: true,
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

pub struct FormController<T> {
    state: FormState,
    reference_options: Vec<String>,
    files: Vec<Attachment>,
    status: SubmissionStatus,
    errors: BTreeMap<Field, &'static str>,
    submit_attempted: bool,
    notification: Option<Notification>,
    transport: T,
    events: Vec<FormEvent>,
}

impl<T> FormController<T> {
    /// `transport` is only used by [`FormController::submit`]; pass `()` for
    /// a form that is validated but never sent.
    pub fn new(transport: T) -> Self {
        Self {
            state: FormState::default(),
            reference_options: Vec::new(),
            files: Vec::new(),
            status: SubmissionStatus::Idle,
            errors: BTreeMap::new(),
            submit_attempted: false,
            notification: None,
            transport,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &FormState { &self.state }
    pub fn files(&self) -> &[Attachment] { &self.files }
    pub fn reference_options(&self) -> &[String] { &self.reference_options }
    pub fn status(&self) -> &SubmissionStatus { &self.status }
    pub fn notification(&self) -> Option<&Notification> { self.notification.as_ref() }
    pub fn transport(&self) -> &T { &self.transport }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting { .. })
    }

    /// Raw error of the last failed submission, kept for diagnostics.
    pub fn last_error(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Failure { error } => Some(error),
            _ => None,
        }
    }

    /// Errors currently marked next to their fields.
    pub fn errors(&self) -> &BTreeMap<Field, &'static str> {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_visible(&self, field: Field) -> bool {
        rules::visibility(field, &self.state)
    }

    pub fn is_valid(&self, field: Field) -> bool {
        rules::validate(field, &self.state)
    }

    pub fn can_submit(&self) -> bool {
        rules::can_submit(&self.state)
    }

    /// Apply one input event. Values of fields that become hidden are kept.
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> Result<&FormState> {
        self.state = self.state.set_field(field, value)?;
        self.leave_terminal_status();
        debug!(field = %field, "field changed");
        self.events.push(FormEvent::FieldChanged { field });

        if self.submit_attempted {
            self.revalidate(field);
        }
        Ok(&self.state)
    }

    /// Label offered for creating a new reference link option.
    pub fn create_label(query: &str) -> String {
        format!("+ Add {}", query)
    }

    /// Create a reference link option and select it. Returns false for an
    /// empty query or one that already exists.
    pub fn add_reference_link(&mut self, query: &str) -> Result<bool> {
        let link = query.trim();
        if link.is_empty() || self.reference_options.iter().any(|o| o == link) {
            return Ok(false);
        }
        self.reference_options.push(link.to_string());

        let mut selected = self.state.reference_links.clone();
        selected.push(link.to_string());
        self.set_field(Field::ReferenceLinks, FieldValue::List(selected))?;
        Ok(true)
    }

    pub fn select_files(&mut self, files: impl IntoIterator<Item = Attachment>) {
        let before = self.files.len();
        self.files.extend(files);
        debug!(added = self.files.len() - before, total = self.files.len(), "files selected");
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    /// Validate every field and mark the failing ones.
    pub fn validate(&mut self) -> ValidationReport {
        self.submit_attempted = true;
        let report = rules::validate_all(&self.state);
        self.errors = report.errors.clone();
        report
    }

    /// Discard everything the user entered.
    pub fn reset(&mut self) {
        self.state = FormState::default();
        self.reference_options.clear();
        self.files.clear();
        self.errors.clear();
        self.submit_attempted = false;
        self.notification = None;
        self.status = SubmissionStatus::Idle;
        self.events.push(FormEvent::FormReset);
    }

    pub fn take_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    fn revalidate(&mut self, field: Field) {
        for target in std::iter::once(field).chain(rules::dependents(field)) {
            let rule = rules::rule(target);
            if rule.is_valid(&self.state) {
                self.errors.remove(&target);
            } else {
                self.errors.insert(target, rule.message);
            }
        }
    }

    fn leave_terminal_status(&mut self) {
        if matches!(self.status, SubmissionStatus::Success { .. } | SubmissionStatus::Failure { .. }) {
            self.status = SubmissionStatus::Idle;
        }
    }
}

impl<T: Transport> FormController<T> {
    /// Submit the form. Invalid forms never reach the transport.
    pub async fn submit(&mut self) -> std::result::Result<SubmissionReceipt, SubmissionError> {
        self.submit_with(|_| {}).await
    }

    /// Submit the form, handing each notification to `on_notify` as it is
    /// raised: the loading indicator before the request goes out, then the
    /// success or failure update carrying the same id.
    pub async fn submit_with<F>(&mut self, mut on_notify: F) -> std::result::Result<SubmissionReceipt, SubmissionError>
    where
        F: FnMut(&Notification),
    {
        let report = self.validate();
        if !report.is_valid() {
            debug!(invalid = report.len(), "submission blocked by validation");
            return Err(SubmissionError::Invalid(report));
        }

        let loading = Notification::loading();
        let notification_id = loading.id;
        on_notify(&loading);
        self.notification = Some(loading);
        self.status = SubmissionStatus::Submitting { notification_id };
        self.events.push(FormEvent::SubmissionStarted { notification_id });

        let payload = SubmissionPayload::build(&self.state, &self.files);
        info!(%notification_id, entries = payload.len(), files = payload.file_count(), "submitting form");

        match self.transport.send(payload).await {
            Ok(response) => {
                let receipt = SubmissionReceipt {
                    notification_id,
                    status: response.status,
                    submitted_at: Utc::now(),
                };
                info!(%notification_id, status = response.status, "form submitted");
                self.events.push(FormEvent::SubmissionSucceeded { notification_id, status: response.status });
                self.reset();
                let notification = Notification::success(notification_id);
                on_notify(&notification);
                self.notification = Some(notification);
                self.status = SubmissionStatus::Success { receipt: receipt.clone() };
                Ok(receipt)
            }
            Err(e) => {
                warn!(%notification_id, error = %e, "form submission failed");
                let notification = Notification::failure(notification_id);
                on_notify(&notification);
                self.notification = Some(notification);
                self.status = SubmissionStatus::Failure { error: e.to_string() };
                self.events.push(FormEvent::SubmissionFailed { notification_id, error: e.to_string() });
                Err(SubmissionError::Transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{OTHERS, RENTAL_EVENT, YES};
    use crate::transport::{TransportError, TransportResponse};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Records every payload and answers with a fixed status.
    struct RecordingTransport {
        status: u16,
        sent: Mutex<Vec<SubmissionPayload>>,
    }

    impl RecordingTransport {
        fn responding(status: u16) -> Self {
            Self { status, sent: Mutex::new(Vec::new()) }
        }

        fn sent(&self) -> Vec<SubmissionPayload> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, payload: SubmissionPayload) -> std::result::Result<TransportResponse, TransportError> {
            self.sent.lock().unwrap().push(payload);
            if (200..300).contains(&self.status) {
                Ok(TransportResponse { status: self.status })
            } else {
                Err(TransportError::Status { status: self.status, body: "rejected".into() })
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fill(form: &mut FormController<RecordingTransport>) {
        let inputs = [
            (Field::AccountManager, FieldValue::text("Aditya")),
            (Field::EmailAddress, FieldValue::text("a@b.com")),
            (Field::ClientName, FieldValue::text("Acme")),
            (Field::DateOfProposalSubmission, FieldValue::date(date(2024, 1, 1))),
            (Field::Estimate, FieldValue::text("Actual")),
            (Field::LocationOfProject, FieldValue::text("Dubai")),
            (Field::TypeOfProject, FieldValue::text("Permanent")),
            (Field::HardwarePurchase, FieldValue::text("No Hardware Required")),
            (Field::TechnicalSupport, FieldValue::text("Not required")),
            (Field::Presentation, FieldValue::text("No")),
            (Field::Sow, FieldValue::text("Build a stage")),
        ];
        for (field, value) in inputs {
            form.set_field(field, value).unwrap();
        }
        assert!(form.add_reference_link("http://example.com").unwrap());
    }

    fn filled(status: u16) -> FormController<RecordingTransport> {
        let mut form = FormController::new(RecordingTransport::responding(status));
        fill(&mut form);
        form
    }

    #[tokio::test]
    async fn test_baseline_submits_without_files() {
        let mut form = filled(200);
        assert!(form.can_submit());
        assert!(form.files().is_empty());

        let receipt = form.submit().await.unwrap();
        assert_eq!(receipt.status, 200);

        let sent = form.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), Field::ALL.len());
        assert_eq!(sent[0].text("clientName"), Some("Acme"));
        assert_eq!(sent[0].text("referenceLinks"), Some("http://example.com"));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_transport() {
        let mut form = filled(200);
        form.set_field(Field::TypeOfProject, FieldValue::text(RENTAL_EVENT)).unwrap();
        assert!(!form.can_submit());

        let err = form.submit().await.unwrap_err();
        match err {
            SubmissionError::Invalid(report) => {
                assert!(report.message(Field::EventDate).is_some());
                assert!(report.message(Field::EventDuration).is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(form.transport().sent().is_empty());
        assert_eq!(form.status(), &SubmissionStatus::Idle);
        assert!(form.notification().is_none());
        assert!(form.error(Field::EventDate).is_some());
    }

    #[tokio::test]
    async fn test_other_presentation_type_flow() {
        let mut form = filled(200);
        form.set_field(Field::Presentation, FieldValue::text(YES)).unwrap();
        form.set_field(Field::PresentationType, FieldValue::text(OTHERS)).unwrap();
        form.set_field(Field::PresentationTypeOthers, FieldValue::text("")).unwrap();
        assert!(form.is_visible(Field::PresentationTypeOthers));
        assert!(!form.can_submit());

        form.set_field(Field::PresentationTypeOthers, FieldValue::text("Live demo")).unwrap();
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn test_success_discards_state() {
        let mut form = filled(200);
        form.select_files([Attachment::new("brief.pdf", b"%PDF".to_vec())]);

        let receipt = form.submit().await.unwrap();

        assert_eq!(form.state(), &FormState::default());
        assert!(form.files().is_empty());
        assert!(form.reference_options().is_empty());
        assert_eq!(form.status(), &SubmissionStatus::Success { receipt: receipt.clone() });

        let notification = form.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.id, receipt.notification_id);

        let sent = form.transport().sent();
        assert_eq!(sent[0].file_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_state_and_allows_retry() {
        let mut form = filled(500);
        let before = form.state().clone();

        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, SubmissionError::Transport(TransportError::Status { status: 500, .. })));

        assert_eq!(form.state(), &before);
        assert!(!form.is_submitting());
        assert!(form.last_error().unwrap().contains("500"));
        let notification = form.notification().unwrap().clone();
        assert_eq!(notification.kind, NotificationKind::Failure);

        // manual retry reaches the transport again
        let _ = form.submit().await;
        assert_eq!(form.transport().sent().len(), 2);
    }

    #[tokio::test]
    async fn test_notification_id_carries_through_lifecycle() {
        let mut form = filled(500);
        let _ = form.submit().await;

        let events = form.take_events();
        let started = events.iter().find_map(|e| match e {
            FormEvent::SubmissionStarted { notification_id } => Some(*notification_id),
            _ => None,
        });
        let failed = events.iter().find_map(|e| match e {
            FormEvent::SubmissionFailed { notification_id, .. } => Some(*notification_id),
            _ => None,
        });
        assert_eq!(started, failed);
        assert_eq!(form.notification().map(|n| n.id), started);
        assert!(form.take_events().is_empty());
    }

    #[tokio::test]
    async fn test_submit_with_shows_loading_then_update_for_same_id() {
        for (status, kind) in [(200, NotificationKind::Success), (500, NotificationKind::Failure)] {
            let mut form = filled(status);
            let mut shown = Vec::new();
            let _ = form.submit_with(|n| shown.push(n.clone())).await;

            assert_eq!(shown.len(), 2);
            assert_eq!(shown[0].kind, NotificationKind::Loading);
            assert_eq!(shown[1].kind, kind);
            assert_eq!(shown[0].id, shown[1].id);
            assert_eq!(form.notification(), Some(&shown[1]));
        }
    }

    #[tokio::test]
    async fn test_blocked_submit_shows_nothing() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        let mut shown = Vec::new();
        assert!(form.submit_with(|n| shown.push(n.clone())).await.is_err());
        assert!(shown.is_empty());
    }

    #[tokio::test]
    async fn test_input_after_failure_returns_to_idle() {
        let mut form = filled(503);
        let _ = form.submit().await;
        assert!(matches!(form.status(), SubmissionStatus::Failure { .. }));

        form.set_field(Field::ClientName, FieldValue::text("Acme Events")).unwrap();
        assert_eq!(form.status(), &SubmissionStatus::Idle);
        assert!(form.last_error().is_none());
    }

    #[tokio::test]
    async fn test_input_after_success_returns_to_idle() {
        let mut form = filled(200);
        form.submit().await.unwrap();
        assert!(matches!(form.status(), SubmissionStatus::Success { .. }));

        form.set_field(Field::ClientName, FieldValue::text("Next client")).unwrap();
        assert_eq!(form.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn test_notification_texts() {
        let loading = Notification::loading();
        assert_eq!(loading.title, "Submitting your Form");
        assert_eq!(loading.message, "Please wait while we submit your form");
        assert!(!loading.auto_close);
        assert!(!loading.closable);

        let success = Notification::success(loading.id);
        assert_eq!(success.id, loading.id);
        assert_eq!(success.title, "Form Submitted");
        assert_eq!(success.message, "Your form has been submitted successfully");
        assert!(success.auto_close && success.closable);

        let failure = Notification::failure(loading.id);
        assert_eq!(failure.id, loading.id);
        assert_eq!(failure.title, "Form Submission Failed");
        assert_eq!(failure.message, "Your form submission failed");
        assert!(failure.auto_close && failure.closable);
    }

    #[test]
    fn test_errors_marked_only_after_first_attempt() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        form.set_field(Field::EmailAddress, FieldValue::text("broken")).unwrap();
        assert!(form.errors().is_empty());

        let report = form.validate();
        assert_eq!(form.errors(), &report.errors);
        assert_eq!(form.error(Field::EmailAddress), Some(rules::EMAIL_MESSAGE));

        form.set_field(Field::EmailAddress, FieldValue::text("a@b.com")).unwrap();
        assert!(form.error(Field::EmailAddress).is_none());
        assert!(form.error(Field::ClientName).is_some());
    }

    #[test]
    fn test_controlling_field_revalidates_dependents() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        fill(&mut form);
        form.set_field(Field::TypeOfProject, FieldValue::text(RENTAL_EVENT)).unwrap();
        form.validate();
        assert!(form.error(Field::EventDate).is_some());

        form.set_field(Field::TypeOfProject, FieldValue::text("Permanent")).unwrap();
        assert!(form.error(Field::EventDate).is_none());
        assert!(form.error(Field::EventDuration).is_none());
    }

    #[test]
    fn test_hidden_values_are_retained() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        form.set_field(Field::TypeOfProject, FieldValue::text(RENTAL_EVENT)).unwrap();
        form.set_field(Field::EventDate, FieldValue::date(date(2024, 6, 1))).unwrap();
        form.set_field(Field::TypeOfProject, FieldValue::text("Permanent")).unwrap();

        assert!(!form.is_visible(Field::EventDate));
        assert_eq!(form.state().event_date, Some(date(2024, 6, 1)));
    }

    #[test]
    fn test_reference_links() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        assert_eq!(FormController::<RecordingTransport>::create_label("http://x"), "+ Add http://x");

        assert!(form.add_reference_link(" http://a ").unwrap());
        assert!(form.add_reference_link("http://b").unwrap());
        assert!(!form.add_reference_link("http://a").unwrap());
        assert!(!form.add_reference_link("   ").unwrap());

        assert_eq!(form.reference_options(), ["http://a", "http://b"]);
        assert_eq!(form.state().reference_links, vec!["http://a".to_string(), "http://b".to_string()]);

        form.set_field(Field::ReferenceLinks, FieldValue::list(["http://b"])).unwrap();
        assert_eq!(form.reference_options().len(), 2);
        assert!(form.is_valid(Field::ReferenceLinks));
    }

    #[test]
    fn test_files_append_until_cleared() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        form.select_files([Attachment::new("a.pdf", b"a".to_vec())]);
        form.select_files([Attachment::new("b.pdf", b"b".to_vec()), Attachment::new("c.pdf", b"c".to_vec())]);
        let names: Vec<_> = form.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);

        form.clear_files();
        assert!(form.files().is_empty());
    }

    #[test]
    fn test_type_mismatch_leaves_state_untouched() {
        let mut form = FormController::new(RecordingTransport::responding(200));
        assert!(form.set_field(Field::EventDuration, FieldValue::text("two")).is_err());
        assert_eq!(form.state(), &FormState::default());
        assert!(form.take_events().is_empty());
    }
}
