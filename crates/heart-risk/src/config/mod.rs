use crate::form::FileDraftStore;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub predictor: PredictorConfig,
    pub drafts: DraftConfig,
    pub reports: ReportConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("PREDICTOR_URL")
            .unwrap_or_else(|_| PredictorConfig::DEFAULT_URL.to_string());
        let predictor = PredictorConfig::new(base_url)?;

        let draft_path = match env::var("DRAFT_PATH") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => FileDraftStore::default_path(),
        };

        let output_dir = env::var("REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            predictor,
            drafts: DraftConfig { path: draft_path },
            reports: ReportConfig { output_dir },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the prediction and report backend.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub base_url: String,
}

impl PredictorConfig {
    pub const DEFAULT_URL: &'static str = "http://127.0.0.1:5000";

    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidPredictorUrl { value: base_url });
        }
        Ok(Self { base_url })
    }
}

/// Where the in-progress draft is persisted; `None` disables persistence.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPredictorUrl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPredictorUrl { value } => write!(
                f,
                "PREDICTOR_URL must be an http:// or https:// URL, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("PREDICTOR_URL");
        env::remove_var("DRAFT_PATH");
        env::remove_var("REPORT_DIR");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.predictor.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.reports.output_dir, PathBuf::from("."));
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("PREDICTOR_URL", "https://risk.example.org");
        env::set_var("DRAFT_PATH", "/tmp/heart-risk/draft.json");
        env::set_var("REPORT_DIR", "/tmp/reports");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.predictor.base_url, "https://risk.example.org");
        assert_eq!(
            config.drafts.path,
            Some(PathBuf::from("/tmp/heart-risk/draft.json"))
        );
        assert_eq!(config.reports.output_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn rejects_non_http_predictor_url() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PREDICTOR_URL", "ftp://models.local");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidPredictorUrl { .. })
        ));
    }
}
