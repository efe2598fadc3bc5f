use crate::form::FormValues;
use serde::{Deserialize, Serialize};

use super::client::PredictionError;

/// Backend verdict for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: u8,
    pub probability: f64,
}

#[derive(Debug, Deserialize)]
struct PredictionBody {
    prediction: i64,
    probability: f64,
}

impl PredictionResult {
    pub fn new(prediction: u8, probability: f64) -> Result<Self, PredictionError> {
        if prediction > 1 {
            return Err(PredictionError::Protocol(format!(
                "prediction must be 0 or 1, got {prediction}"
            )));
        }
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PredictionError::Protocol(format!(
                "probability must lie within [0, 1], got {probability}"
            )));
        }
        Ok(Self {
            prediction,
            probability,
        })
    }

    /// Parse a 2xx response body.
    pub fn from_json(body: &[u8]) -> Result<Self, PredictionError> {
        let parsed: PredictionBody = serde_json::from_slice(body)
            .map_err(|err| PredictionError::Protocol(err.to_string()))?;
        let prediction = u8::try_from(parsed.prediction).map_err(|_| {
            PredictionError::Protocol(format!(
                "prediction must be 0 or 1, got {}",
                parsed.prediction
            ))
        })?;
        Self::new(prediction, parsed.probability)
    }

    pub fn disease_detected(&self) -> bool {
        self.prediction == 1
    }
}

/// Payload for `/generate-report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub prediction: u8,
    pub probability: f64,
    pub parameters: FormValues,
    pub timestamp: String,
}

/// Opaque document returned by the report backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Generated report ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDownload {
    pub file_name: String,
    pub artifact: ReportArtifact,
}

pub fn report_file_name(epoch_millis: i64) -> String {
    format!("heart-disease-prediction-{epoch_millis}.pdf")
}
