use crate::form::{FieldName, FormValues};
use crate::prediction::ReportRequest;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

/// Interaction phase of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Displaying(Outcome),
}

impl FormState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Displaying(Outcome::Success) => "displaying a result",
            Self::Displaying(Outcome::Error) => "displaying an error",
        }
    }

    pub const fn controls_enabled(self) -> bool {
        !matches!(self, Self::Submitting)
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User-facing actions, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    EditField,
    BlurField,
    LoadExample,
    CloseResult,
    OpenDetail,
    CloseDetail,
    DownloadReport,
    Reset,
}

impl Action {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::EditField => "editing a field",
            Self::BlurField => "leaving a field",
            Self::LoadExample => "loading example data",
            Self::CloseResult => "closing the result",
            Self::OpenDetail => "opening prediction details",
            Self::CloseDetail => "closing prediction details",
            Self::DownloadReport => "downloading the report",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{action} is unavailable while {state}")]
    NotAllowed { action: Action, state: FormState },
    #[error("the prediction details are not open")]
    DetailNotOpen,
    #[error("a report is already being generated")]
    ReportInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Hidden,
    Open,
}

/// Where the user's attention should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Field(FieldName),
    ResultPanel,
}

/// Issued when validation passes; exchanged for the outcome of the request.
#[derive(Debug)]
pub struct PredictionTicket {
    pub(super) values: FormValues,
}

impl PredictionTicket {
    pub fn values(&self) -> &FormValues {
        &self.values
    }
}

#[derive(Debug)]
pub enum SubmitStep {
    /// Validation failed; no request may be made.
    Rejected,
    Pending(PredictionTicket),
}

#[derive(Debug)]
pub struct ReportTicket {
    pub(super) request: ReportRequest,
    pub(super) requested_at_ms: i64,
}

impl ReportTicket {
    pub fn request(&self) -> &ReportRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub meta: bool,
    pub key: Key,
}

impl KeyChord {
    pub const fn plain(key: Key) -> Self {
        Self {
            ctrl: false,
            meta: false,
            key,
        }
    }

    /// Ctrl+Enter or Cmd+Enter.
    pub const fn is_submit_shortcut(self) -> bool {
        (self.ctrl || self.meta) && matches!(self.key, Key::Enter)
    }
}

/// UI events routed through [`super::FormController::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Edit { field: FieldName, value: String },
    Blur(FieldName),
    LoadExample,
    Submit,
    Key(KeyChord),
    CloseResult,
    LearnMore,
    CloseModal,
    DownloadReport,
    Reset,
}
