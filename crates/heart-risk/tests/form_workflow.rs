mod common;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::StubBackend;
use heart_risk::controller::{FormController, FormState, Outcome};
use heart_risk::form::{DraftStore, FieldName, FileDraftStore, FormValues};
use heart_risk::prediction::HttpPredictionClient;
use heart_risk::presenter::RiskCategory;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn high_risk_backend() -> StubBackend {
    StubBackend::start(Router::new().route(
        "/predict",
        post(|| async { Json(json!({ "prediction": 1, "probability": 0.82 })) }),
    ))
}

#[test]
fn example_patient_is_rendered_as_high_risk() {
    let backend = high_risk_backend();
    let dir = tempdir().expect("temp dir");
    let drafts = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));
    let client = Arc::new(HttpPredictionClient::new(backend.base_url()));
    let mut controller = FormController::new(client, drafts);

    for (name, value) in FormValues::example().iter() {
        controller
            .edit_field(name, value.to_string())
            .expect("editing allowed");
    }
    let state = controller.submit().expect("submission runs");

    assert_eq!(state, FormState::Displaying(Outcome::Success));
    let view = controller.view();
    let result = view.panel.result().expect("result shown");
    assert_eq!(result.category, RiskCategory::High);
    assert_eq!(result.headline, "Heart Disease Detected");
    assert_eq!(result.probability_text, "82.0%");
    assert!(view.all_controls_enabled());
}

#[test]
fn backend_error_message_is_shown_in_result_panel() {
    let backend = StubBackend::start(Router::new().route(
        "/predict",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "model unavailable" })),
            )
        }),
    ));
    let dir = tempdir().expect("temp dir");
    let drafts = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));
    let client = Arc::new(HttpPredictionClient::new(backend.base_url()));
    let mut controller = FormController::new(client, drafts);
    controller.load_example().expect("example loads");

    let state = controller.submit().expect("submission runs");

    assert_eq!(state, FormState::Displaying(Outcome::Error));
    assert_eq!(controller.panel().error(), Some("model unavailable"));
    assert!(controller.view().all_controls_enabled());
}

#[test]
fn draft_survives_restart_and_reset_hides_result() {
    let backend = high_risk_backend();
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("draft.json");

    {
        let drafts = Arc::new(FileDraftStore::new(&path));
        let client = Arc::new(HttpPredictionClient::new(backend.base_url()));
        let mut controller = FormController::new(client, drafts);
        controller.edit_field(FieldName::Age, "47").expect("edit allowed");
        controller.edit_field(FieldName::Cp, "2").expect("edit allowed");
    }

    let drafts = Arc::new(FileDraftStore::new(&path));
    let client = Arc::new(HttpPredictionClient::new(backend.base_url()));
    let mut controller = FormController::new(client, drafts.clone());
    assert_eq!(controller.values().get(FieldName::Age), "47");
    assert_eq!(controller.values().get(FieldName::Cp), "2");
    assert_eq!(controller.values().get(FieldName::Chol), "");

    controller.load_example().expect("example loads");
    controller.submit().expect("submission runs");
    assert!(controller.view().panel.is_visible());

    controller.reset().expect("reset allowed");
    let view = controller.view();
    assert!(!view.panel.is_visible());
    assert!(view.fields.iter().all(|field| field.value.is_empty()));
    assert_eq!(drafts.load(), FormValues::example());
}

#[test]
fn corrupt_draft_file_is_discarded() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("draft.json");
    std::fs::write(&path, "{\"age\": \"6").expect("write corrupt draft");
    let drafts = FileDraftStore::new(&path);

    assert!(drafts.try_load().is_err());
    assert!(drafts.load().is_blank());

    drafts.save(&FormValues::example()).expect("save replaces corrupt draft");
    assert_eq!(drafts.load(), FormValues::example());

    drafts.clear().expect("clear succeeds");
    assert!(!path.exists());
    drafts.clear().expect("clearing twice is harmless");
}
