mod client;
pub mod domain;
mod http;

pub use client::{
    PredictionClient, PredictionError, ReportError, DEFAULT_SERVER_MESSAGE, REPORT_FAILURE_ALERT,
};
pub use domain::{
    report_file_name, PredictionResult, ReportArtifact, ReportDownload, ReportRequest,
};
pub use http::HttpPredictionClient;
