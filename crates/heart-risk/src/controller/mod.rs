//! Interaction state machine for the risk form.
//!
//! [`FormController`] owns the live field values and every piece of UI state
//! (invalid markers, busy indicator, result panel, detail modal). Network calls
//! are split into `begin_*` / `complete_*` pairs so a driver can run the request
//! elsewhere and hand the outcome back; `submit` and `download_report` run both
//! halves inline against the injected client.

mod state;
mod view;

#[cfg(test)]
mod tests;

pub use state::{
    Action, Focus, FormState, Key, KeyChord, ModalState, Outcome, PredictionTicket,
    ReportTicket, SubmitStep, TransitionError, UiEvent,
};
pub use view::{
    FieldView, FormView, ResultPanel, FORM_ERROR_MESSAGE, SUBMITTING_LABEL, SUBMIT_LABEL,
};

use crate::form::{
    validate_all, validate_field, DraftStore, FieldName, FormValues, ValidationResult,
    FIELD_SCHEMA,
};
use crate::prediction::{
    report_file_name, PredictionClient, PredictionError, PredictionResult, ReportArtifact,
    ReportDownload, ReportError, ReportRequest, REPORT_FAILURE_ALERT,
};
use crate::presenter;
use chrono::{DateTime, TimeZone};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of routing a [`UiEvent`].
#[derive(Debug)]
pub enum EventOutcome {
    State(FormState),
    Validation(ValidationResult),
    Download(Option<ReportDownload>),
    Ignored,
}

pub struct FormController<C, S> {
    client: Arc<C>,
    drafts: Arc<S>,
    values: FormValues,
    markers: BTreeMap<FieldName, String>,
    state: FormState,
    panel: ResultPanel,
    modal: ModalState,
    form_error: Option<String>,
    focus: Focus,
    report_in_flight: bool,
    alerts: Vec<String>,
}

impl<C, S> FormController<C, S>
where
    C: PredictionClient + 'static,
    S: DraftStore + 'static,
{
    /// Build the controller and restore any stored draft.
    pub fn new(client: Arc<C>, drafts: Arc<S>) -> Self {
        let mut values = FormValues::new();
        values.merge_non_empty(&drafts.load());

        Self {
            client,
            drafts,
            values,
            markers: BTreeMap::new(),
            state: FormState::Idle,
            panel: ResultPanel::Hidden,
            modal: ModalState::Hidden,
            form_error: None,
            focus: Focus::Form,
            report_in_flight: false,
            alerts: Vec::new(),
        }
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn panel(&self) -> &ResultPanel {
        &self.panel
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    /// Drain alerts raised since the last call.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn view(&self) -> FormView {
        let enabled = self.state.controls_enabled();
        let fields = FieldName::ordered()
            .into_iter()
            .map(|name| FieldView {
                name,
                value: self.values.get(name).to_string(),
                enabled,
                invalid: self.markers.get(&name).cloned(),
            })
            .collect();

        FormView {
            state: self.state,
            fields,
            submit_enabled: enabled,
            reset_enabled: enabled,
            busy: self.state == FormState::Submitting,
            submit_label: if enabled { SUBMIT_LABEL } else { SUBMITTING_LABEL },
            form_error: self.form_error.clone(),
            panel: self.panel.clone(),
            modal_open: self.modal == ModalState::Open,
            report_pending: self.report_in_flight,
            focus: self.focus,
        }
    }

    /// Route a UI event to its transition.
    pub fn handle(&mut self, event: UiEvent) -> Result<EventOutcome, TransitionError> {
        match event {
            UiEvent::Edit { field, value } => {
                self.edit_field(field, value)?;
                Ok(EventOutcome::State(self.state))
            }
            UiEvent::Blur(field) => self.blur_field(field).map(EventOutcome::Validation),
            UiEvent::LoadExample => {
                self.load_example()?;
                Ok(EventOutcome::State(self.state))
            }
            UiEvent::Submit => self.submit().map(EventOutcome::State),
            UiEvent::Key(chord) => Ok(match self.shortcut(chord)? {
                Some(state) => EventOutcome::State(state),
                None => EventOutcome::Ignored,
            }),
            UiEvent::CloseResult => self.close_result().map(EventOutcome::State),
            UiEvent::LearnMore => {
                self.open_detail()?;
                Ok(EventOutcome::State(self.state))
            }
            UiEvent::CloseModal => {
                self.close_detail()?;
                Ok(EventOutcome::State(self.state))
            }
            UiEvent::DownloadReport => self
                .download_report(chrono::Local::now())
                .map(EventOutcome::Download),
            UiEvent::Reset => self.reset().map(EventOutcome::State),
        }
    }

    pub fn edit_field(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) -> Result<(), TransitionError> {
        self.ensure_controls(Action::EditField)?;
        self.values.set(field, value);
        self.markers.remove(&field);
        self.persist_draft();
        Ok(())
    }

    /// Validate a single field as the user leaves it.
    pub fn blur_field(&mut self, field: FieldName) -> Result<ValidationResult, TransitionError> {
        self.ensure_controls(Action::BlurField)?;
        let result = validate_field(field.spec(), self.values.get(field));
        self.apply_marker(field, &result);
        Ok(result)
    }

    pub fn load_example(&mut self) -> Result<(), TransitionError> {
        self.ensure_controls(Action::LoadExample)?;
        self.values = FormValues::example();
        self.markers.clear();
        self.persist_draft();
        Ok(())
    }

    /// Validate and, when every field passes, enter `Submitting`.
    pub fn begin_submit(&mut self) -> Result<SubmitStep, TransitionError> {
        self.ensure_controls(Action::Submit)?;

        self.transition(FormState::Validating);
        self.form_error = None;
        let report = validate_all(&FIELD_SCHEMA, &self.values);
        for (name, result) in report.iter() {
            self.apply_marker(name, result);
        }

        if let Some(first) = report.first_invalid() {
            self.form_error = Some(FORM_ERROR_MESSAGE.to_string());
            self.panel = ResultPanel::Hidden;
            self.modal = ModalState::Hidden;
            self.focus = Focus::Field(first);
            self.transition(FormState::Idle);
            return Ok(SubmitStep::Rejected);
        }

        self.modal = ModalState::Hidden;
        self.transition(FormState::Submitting);
        Ok(SubmitStep::Pending(PredictionTicket {
            values: self.values.clone(),
        }))
    }

    pub fn complete_submit(
        &mut self,
        ticket: PredictionTicket,
        outcome: Result<PredictionResult, PredictionError>,
    ) -> Result<FormState, TransitionError> {
        if self.state != FormState::Submitting {
            return Err(TransitionError::NotAllowed {
                action: Action::Submit,
                state: self.state,
            });
        }

        match outcome {
            Ok(result) => {
                let view = presenter::render(result, ticket.values);
                self.panel = ResultPanel::Result(Box::new(view));
                self.transition(FormState::Displaying(Outcome::Success));
            }
            Err(err) => {
                warn!(error = %err, "prediction failed");
                self.panel = ResultPanel::Error(err.user_message());
                self.transition(FormState::Displaying(Outcome::Error));
            }
        }
        self.focus = Focus::ResultPanel;
        Ok(self.state)
    }

    /// Run a full submission cycle against the injected client.
    pub fn submit(&mut self) -> Result<FormState, TransitionError> {
        match self.begin_submit()? {
            SubmitStep::Rejected => Ok(self.state),
            SubmitStep::Pending(ticket) => {
                let outcome = self.client.predict(ticket.values());
                self.complete_submit(ticket, outcome)
            }
        }
    }

    /// Ctrl/Cmd+Enter submits unless a request is already in flight.
    pub fn accepts_shortcut(&self, chord: KeyChord) -> bool {
        chord.is_submit_shortcut() && self.state != FormState::Submitting
    }

    pub fn shortcut(&mut self, chord: KeyChord) -> Result<Option<FormState>, TransitionError> {
        if !self.accepts_shortcut(chord) {
            return Ok(None);
        }
        self.submit().map(Some)
    }

    pub fn close_result(&mut self) -> Result<FormState, TransitionError> {
        if !matches!(self.state, FormState::Displaying(_)) {
            return Err(TransitionError::NotAllowed {
                action: Action::CloseResult,
                state: self.state,
            });
        }
        self.panel = ResultPanel::Hidden;
        self.modal = ModalState::Hidden;
        self.focus = Focus::Form;
        self.transition(FormState::Idle);
        Ok(self.state)
    }

    pub fn open_detail(&mut self) -> Result<(), TransitionError> {
        self.ensure_success(Action::OpenDetail)?;
        self.modal = ModalState::Open;
        Ok(())
    }

    pub fn close_detail(&mut self) -> Result<(), TransitionError> {
        if self.modal != ModalState::Open {
            return Err(TransitionError::DetailNotOpen);
        }
        self.modal = ModalState::Hidden;
        Ok(())
    }

    /// Build the report request from the displayed result and its retained values.
    pub fn begin_report_download<Tz: TimeZone>(
        &mut self,
        now: DateTime<Tz>,
    ) -> Result<ReportTicket, TransitionError>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.ensure_success(Action::DownloadReport)?;
        if self.report_in_flight {
            return Err(TransitionError::ReportInFlight);
        }
        let Some(view) = self.panel.result() else {
            return Err(TransitionError::NotAllowed {
                action: Action::DownloadReport,
                state: self.state,
            });
        };

        let request = ReportRequest {
            prediction: view.result.prediction,
            probability: view.result.probability,
            parameters: view.parameters.clone(),
            timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        self.report_in_flight = true;
        Ok(ReportTicket {
            request,
            requested_at_ms: now.timestamp_millis(),
        })
    }

    /// Failures raise an alert and leave the displayed result untouched.
    pub fn complete_report_download(
        &mut self,
        ticket: ReportTicket,
        outcome: Result<ReportArtifact, ReportError>,
    ) -> Option<ReportDownload> {
        self.report_in_flight = false;
        match outcome {
            Ok(artifact) => Some(ReportDownload {
                file_name: report_file_name(ticket.requested_at_ms),
                artifact,
            }),
            Err(err) => {
                warn!(error = %err, "error generating report");
                self.alerts.push(REPORT_FAILURE_ALERT.to_string());
                None
            }
        }
    }

    pub fn download_report<Tz: TimeZone>(
        &mut self,
        now: DateTime<Tz>,
    ) -> Result<Option<ReportDownload>, TransitionError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let ticket = self.begin_report_download(now)?;
        let outcome = self.client.generate_report(ticket.request());
        Ok(self.complete_report_download(ticket, outcome))
    }

    /// Clear every field and hide the result panel. The stored draft is kept.
    pub fn reset(&mut self) -> Result<FormState, TransitionError> {
        self.ensure_controls(Action::Reset)?;
        self.values.clear();
        self.markers.clear();
        self.form_error = None;
        self.panel = ResultPanel::Hidden;
        self.modal = ModalState::Hidden;
        self.focus = Focus::Form;
        self.transition(FormState::Idle);
        Ok(self.state)
    }

    fn ensure_controls(&self, action: Action) -> Result<(), TransitionError> {
        if self.state.controls_enabled() {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                action,
                state: self.state,
            })
        }
    }

    fn ensure_success(&self, action: Action) -> Result<(), TransitionError> {
        if self.state == FormState::Displaying(Outcome::Success) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                action,
                state: self.state,
            })
        }
    }

    fn apply_marker(&mut self, field: FieldName, result: &ValidationResult) {
        match (&result.message, result.valid) {
            (Some(message), false) => {
                self.markers.insert(field, message.clone());
            }
            _ => {
                self.markers.remove(&field);
            }
        }
    }

    fn persist_draft(&self) {
        if let Err(err) = self.drafts.save(&self.values) {
            warn!(error = %err, "unable to persist draft");
        }
    }

    fn transition(&mut self, next: FormState) {
        debug!(from = %self.state, to = %next, "form transition");
        self.state = next;
    }
}
