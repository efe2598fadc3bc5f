use crate::controller::FormController;
use crate::form::{FormValues, InMemoryDraftStore};
use crate::prediction::{
    PredictionClient, PredictionError, PredictionResult, ReportArtifact, ReportError,
    ReportRequest,
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(super) struct FakePredictionClient {
    predictions: Mutex<VecDeque<Result<PredictionResult, PredictionError>>>,
    reports: Mutex<VecDeque<Result<ReportArtifact, ReportError>>>,
    predict_calls: Mutex<Vec<FormValues>>,
    report_calls: Mutex<Vec<ReportRequest>>,
}

impl FakePredictionClient {
    pub(super) fn with_prediction(outcome: Result<PredictionResult, PredictionError>) -> Self {
        let client = Self::default();
        client.push_prediction(outcome);
        client
    }

    pub(super) fn push_prediction(&self, outcome: Result<PredictionResult, PredictionError>) {
        self.predictions
            .lock()
            .expect("prediction queue poisoned")
            .push_back(outcome);
    }

    pub(super) fn push_report(&self, outcome: Result<ReportArtifact, ReportError>) {
        self.reports
            .lock()
            .expect("report queue poisoned")
            .push_back(outcome);
    }

    pub(super) fn predict_calls(&self) -> Vec<FormValues> {
        self.predict_calls.lock().expect("call log poisoned").clone()
    }

    pub(super) fn report_calls(&self) -> Vec<ReportRequest> {
        self.report_calls.lock().expect("call log poisoned").clone()
    }
}

impl PredictionClient for FakePredictionClient {
    fn predict(&self, values: &FormValues) -> Result<PredictionResult, PredictionError> {
        self.predict_calls
            .lock()
            .expect("call log poisoned")
            .push(values.clone());
        self.predictions
            .lock()
            .expect("prediction queue poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(PredictionError::Network("no scripted response".to_string())))
    }

    fn generate_report(&self, request: &ReportRequest) -> Result<ReportArtifact, ReportError> {
        self.report_calls
            .lock()
            .expect("call log poisoned")
            .push(request.clone());
        self.reports
            .lock()
            .expect("report queue poisoned")
            .pop_front()
            .unwrap_or(Err(ReportError::Server { status: 500 }))
    }
}

pub(super) type TestController = FormController<FakePredictionClient, InMemoryDraftStore>;

pub(super) fn controller(client: FakePredictionClient) -> (TestController, Arc<FakePredictionClient>) {
    let client = Arc::new(client);
    let drafts = Arc::new(InMemoryDraftStore::default());
    (FormController::new(client.clone(), drafts), client)
}

pub(super) fn controller_with_drafts(
    client: FakePredictionClient,
    drafts: InMemoryDraftStore,
) -> TestController {
    FormController::new(Arc::new(client), Arc::new(drafts))
}

pub(super) fn high_risk() -> PredictionResult {
    PredictionResult::new(1, 0.82).expect("valid result")
}

pub(super) fn pdf_artifact() -> ReportArtifact {
    ReportArtifact {
        bytes: b"%PDF-1.4 stub".to_vec(),
        content_type: Some("application/pdf".to_string()),
    }
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_760_000_000_000)
        .single()
        .expect("valid timestamp")
}

/// Controller showing a successful high-risk result for the example patient.
pub(super) fn displaying_success() -> (TestController, Arc<FakePredictionClient>) {
    let (mut controller, client) = controller(FakePredictionClient::with_prediction(Ok(high_risk())));
    controller.load_example().expect("example loads");
    controller.submit().expect("submission runs");
    (controller, client)
}
