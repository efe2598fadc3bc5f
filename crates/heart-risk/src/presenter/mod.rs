//! Turns a [`PredictionResult`] into the display model shown in the result panel.

mod view;

pub use view::{FollowOnAction, ProbabilityIndicator, ResultView};

use crate::form::FormValues;
use crate::prediction::PredictionResult;
use serde::Serialize;

pub const MEDIUM_RISK_THRESHOLD: f64 = 0.30;
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

/// Thresholds are inclusive toward the higher category.
pub fn classify(probability: f64) -> RiskCategory {
    if probability < MEDIUM_RISK_THRESHOLD {
        RiskCategory::Low
    } else if probability < HIGH_RISK_THRESHOLD {
        RiskCategory::Medium
    } else {
        RiskCategory::High
    }
}

pub fn render(result: PredictionResult, parameters: FormValues) -> ResultView {
    let category = classify(result.probability);
    // Half-up to one decimal; the text and the bar share this value.
    let percent = (result.probability * 1000.0).round() / 10.0;
    let (headline, summary) = if result.disease_detected() {
        (
            "Heart Disease Detected",
            "Based on the provided parameters, the model predicts a significant likelihood of heart disease.",
        )
    } else {
        (
            "No Heart Disease Detected",
            "Based on the provided parameters, the model predicts a lower likelihood of heart disease.",
        )
    };

    ResultView {
        result,
        category,
        badge: category.label(),
        headline,
        summary,
        probability_text: format!("{percent:.1}%"),
        indicator: ProbabilityIndicator::new(percent),
        actions: [FollowOnAction::OpenDetail, FollowOnAction::DownloadReport],
        parameters,
    }
}

/// Body of the "learn more" modal.
pub const DETAIL_NOTES: &[&str] = &[
    "The prediction comes from a logistic regression model trained on the Cleveland heart disease dataset.",
    "Inputs are standardized with the scaler fitted during training before the model scores them.",
    "The probability is the model's estimate that the patient has heart disease; risk bands are Low below 30%, Medium from 30% to 70% and High from 70% upward.",
    "The model is a screening aid. It does not replace a diagnosis by a qualified clinician.",
];
