use super::RiskCategory;
use crate::form::FormValues;
use crate::prediction::PredictionResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOnAction {
    OpenDetail,
    DownloadReport,
}

impl FollowOnAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenDetail => "Learn more about this prediction",
            Self::DownloadReport => "Download Report",
        }
    }
}

/// Fill animation for the probability bar; purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityIndicator {
    pub start_percent: f64,
    pub target_percent: f64,
}

impl ProbabilityIndicator {
    pub fn new(target_percent: f64) -> Self {
        Self {
            start_percent: 0.0,
            target_percent: target_percent.clamp(0.0, 100.0),
        }
    }

    /// Fill level after `progress` (0..=1) of the animation.
    pub fn at(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        self.start_percent + (self.target_percent - self.start_percent) * progress
    }
}

/// Display-ready result; replaced wholesale on every submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub result: PredictionResult,
    pub category: RiskCategory,
    pub badge: &'static str,
    pub headline: &'static str,
    pub summary: &'static str,
    pub probability_text: String,
    pub indicator: ProbabilityIndicator,
    pub actions: [FollowOnAction; 2],
    /// Values submitted with this prediction, replayed for the report.
    pub parameters: FormValues,
}
