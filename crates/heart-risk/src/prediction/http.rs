//! HTTP implementation of [`PredictionClient`] backed by a blocking `ureq` agent.

use super::client::{PredictionClient, PredictionError, ReportError, DEFAULT_SERVER_MESSAGE};
use super::domain::{PredictionResult, ReportArtifact, ReportRequest};
use crate::form::FormValues;
use serde::Deserialize;
use std::io::{self, Read};
use tracing::{debug, info};

const MAX_PREDICTION_RESPONSE_BYTES: usize = 64 * 1024;
const MAX_REPORT_RESPONSE_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpPredictionClient {
    /// Connection-level timeouts are left to the transport defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_agent(ureq::AgentBuilder::new().build(), base_url)
    }

    pub fn with_agent(agent: ureq::Agent, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl PredictionClient for HttpPredictionClient {
    fn predict(&self, values: &FormValues) -> Result<PredictionResult, PredictionError> {
        let url = self.endpoint("predict");
        debug!(%url, "requesting prediction");

        let request = self
            .agent
            .post(&url)
            .set("Accept", mime::APPLICATION_JSON.as_ref());

        let response = match request.send_json(values) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = read_limited(response, MAX_PREDICTION_RESPONSE_BYTES)
                    .unwrap_or_default();
                let message = server_message(&body);
                info!(status, %message, "prediction rejected by backend");
                return Err(PredictionError::Server { status, message });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(PredictionError::Network(err.to_string()));
            }
        };

        let body = read_limited(response, MAX_PREDICTION_RESPONSE_BYTES)
            .map_err(|err| PredictionError::Protocol(err.to_string()))?;
        let result = PredictionResult::from_json(&body)?;
        info!(
            prediction = result.prediction,
            probability = result.probability,
            "prediction received"
        );
        Ok(result)
    }

    fn generate_report(&self, request: &ReportRequest) -> Result<ReportArtifact, ReportError> {
        let url = self.endpoint("generate-report");
        debug!(%url, "requesting report");

        let call = self
            .agent
            .post(&url)
            .set("Accept", mime::APPLICATION_PDF.as_ref());

        let response = match call.send_json(request) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => return Err(ReportError::Server { status }),
            Err(ureq::Error::Transport(err)) => return Err(ReportError::Network(err.to_string())),
        };

        let content_type = response.header("Content-Type").map(str::to_string);
        let bytes = read_limited(response, MAX_REPORT_RESPONSE_BYTES)
            .map_err(|err| ReportError::Network(err.to_string()))?;
        info!(bytes = bytes.len(), "report received");
        Ok(ReportArtifact {
            bytes,
            content_type,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Message for a non-2xx response; unparsable bodies fall back to the default.
fn server_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string())
}

fn read_limited(response: ureq::Response, max_bytes: usize) -> Result<Vec<u8>, io::Error> {
    let mut limited = response.into_reader().take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}
