use super::state::{Focus, FormState};
use crate::form::FieldName;
use crate::presenter::ResultView;

pub const SUBMIT_LABEL: &str = "Predict Risk";
pub const SUBMITTING_LABEL: &str = "Processing...";
pub const FORM_ERROR_MESSAGE: &str = "Please check your inputs and try again.";

/// Content hosted by the result panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    Hidden,
    Result(Box<ResultView>),
    Error(String),
}

impl ResultPanel {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn result(&self) -> Option<&ResultView> {
        match self {
            Self::Result(view) => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: FieldName,
    pub value: String,
    pub enabled: bool,
    /// Tooltip text while the field carries an invalid marker.
    pub invalid: Option<String>,
}

/// Snapshot of everything a front end needs to draw the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub state: FormState,
    pub fields: Vec<FieldView>,
    pub submit_enabled: bool,
    pub reset_enabled: bool,
    pub busy: bool,
    pub submit_label: &'static str,
    pub form_error: Option<String>,
    pub panel: ResultPanel,
    pub modal_open: bool,
    pub report_pending: bool,
    pub focus: Focus,
}

impl FormView {
    pub fn field(&self, name: FieldName) -> &FieldView {
        &self.fields[name as usize]
    }

    pub fn all_controls_enabled(&self) -> bool {
        self.submit_enabled && self.reset_enabled && self.fields.iter().all(|field| field.enabled)
    }

    pub fn all_controls_disabled(&self) -> bool {
        !self.submit_enabled && !self.reset_enabled && self.fields.iter().all(|field| !field.enabled)
    }
}
