use super::domain::{PredictionResult, ReportArtifact, ReportRequest};
use crate::form::FormValues;

pub const DEFAULT_SERVER_MESSAGE: &str = "Server error";
pub const REPORT_FAILURE_ALERT: &str = "Could not generate report. Please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("Unable to reach the prediction service: {0}")]
    Network(String),
    /// Non-2xx response; the message comes from the body's `error` field.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Unexpected response from the prediction service: {0}")]
    Protocol(String),
}

impl PredictionError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("report service unreachable: {0}")]
    Network(String),
    #[error("report service returned HTTP {status}")]
    Server { status: u16 },
}

/// Gateway to the prediction backend. Both calls are single-shot.
pub trait PredictionClient: Send + Sync {
    fn predict(&self, values: &FormValues) -> Result<PredictionResult, PredictionError>;
    fn generate_report(&self, request: &ReportRequest) -> Result<ReportArtifact, ReportError>;
}
