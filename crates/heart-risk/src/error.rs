use crate::config::ConfigError;
use crate::controller::TransitionError;
use crate::form::{DraftError, UnknownField};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Draft(DraftError),
    Field(UnknownField),
    Transition(TransitionError),
    /// Submission blocked by validation; carries the number of invalid fields.
    InvalidForm(usize),
    Prediction(String),
    Report,
    Runtime(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Draft(err) => write!(f, "draft error: {}", err),
            AppError::Field(err) => write!(f, "input error: {}", err),
            AppError::Transition(err) => write!(f, "form error: {}", err),
            AppError::InvalidForm(count) => {
                write!(f, "form has {} invalid field(s)", count)
            }
            AppError::Prediction(message) => write!(f, "prediction failed: {}", message),
            AppError::Report => write!(f, "report could not be generated"),
            AppError::Runtime(detail) => write!(f, "runtime error: {}", detail),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Draft(err) => Some(err),
            AppError::Field(err) => Some(err),
            AppError::Transition(err) => Some(err),
            AppError::InvalidForm(_)
            | AppError::Prediction(_)
            | AppError::Report
            | AppError::Runtime(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DraftError> for AppError {
    fn from(value: DraftError) -> Self {
        Self::Draft(value)
    }
}

impl From<UnknownField> for AppError {
    fn from(value: UnknownField) -> Self {
        Self::Field(value)
    }
}

impl From<TransitionError> for AppError {
    fn from(value: TransitionError) -> Self {
        Self::Transition(value)
    }
}
