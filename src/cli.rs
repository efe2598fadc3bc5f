use crate::console::{self, Console};
use crate::render::SchemaTable;
use crate::session;
use clap::{Args, Parser, Subcommand};
use heart_risk::config::{AppConfig, PredictorConfig};
use heart_risk::error::AppError;
use heart_risk::form::FieldName;
use heart_risk::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "heart-risk",
    about = "Collect heart disease risk factors and request a risk prediction",
    version
)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive form session (default command)
    Session,
    /// Fill in the form, submit it and print the risk assessment
    Predict(PredictArgs),
    /// Check the form without contacting the prediction service
    Validate(ValidateArgs),
    /// Print the accepted range or codes for every field
    Schema,
    /// Inspect or clear the persisted draft
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DraftCommand {
    /// Print the stored draft values
    Show,
    /// Remove the stored draft
    Clear,
}

#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Override the configured prediction service URL
    #[arg(long, global = true)]
    predictor_url: Option<String>,
    /// Override the configured draft file location
    #[arg(long, global = true)]
    draft_path: Option<PathBuf>,
    /// Directory downloaded reports are written to
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,
    /// Neither restore nor persist the in-progress draft
    #[arg(long, global = true)]
    no_draft: bool,
}

/// One optional flag per form field; given values are applied as edits.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FieldArgs {
    /// Age in years [1, 120]
    #[arg(long)]
    pub(crate) age: Option<String>,
    /// Sex (1 = male, 0 = female)
    #[arg(long)]
    pub(crate) sex: Option<String>,
    /// Chest pain type {0, 1, 2, 3}
    #[arg(long)]
    pub(crate) cp: Option<String>,
    /// Resting blood pressure in mm Hg [80, 250]
    #[arg(long)]
    pub(crate) trestbps: Option<String>,
    /// Serum cholesterol in mg/dl [100, 600]
    #[arg(long)]
    pub(crate) chol: Option<String>,
    /// Fasting blood sugar > 120 mg/dl {0, 1}
    #[arg(long)]
    pub(crate) fbs: Option<String>,
    /// Resting ECG results {0, 1, 2}
    #[arg(long)]
    pub(crate) restecg: Option<String>,
    /// Maximum heart rate achieved [60, 220]
    #[arg(long)]
    pub(crate) thalach: Option<String>,
    /// Exercise induced angina {0, 1}
    #[arg(long)]
    pub(crate) exang: Option<String>,
    /// ST depression induced by exercise [0, 10]
    #[arg(long)]
    pub(crate) oldpeak: Option<String>,
    /// Slope of the peak exercise ST segment {0, 1, 2}
    #[arg(long)]
    pub(crate) slope: Option<String>,
    /// Major vessels colored by fluoroscopy {0, 1, 2, 3, 4}
    #[arg(long)]
    pub(crate) ca: Option<String>,
    /// Thalassemia {1, 2, 3}
    #[arg(long)]
    pub(crate) thal: Option<String>,
}

impl FieldArgs {
    pub(crate) fn edits(&self) -> Vec<(FieldName, String)> {
        let values = [
            (FieldName::Age, &self.age),
            (FieldName::Sex, &self.sex),
            (FieldName::Cp, &self.cp),
            (FieldName::Trestbps, &self.trestbps),
            (FieldName::Chol, &self.chol),
            (FieldName::Fbs, &self.fbs),
            (FieldName::Restecg, &self.restecg),
            (FieldName::Thalach, &self.thalach),
            (FieldName::Exang, &self.exang),
            (FieldName::Oldpeak, &self.oldpeak),
            (FieldName::Slope, &self.slope),
            (FieldName::Ca, &self.ca),
            (FieldName::Thal, &self.thal),
        ];
        values
            .into_iter()
            .filter_map(|(name, value)| value.clone().map(|value| (name, value)))
            .collect()
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    #[command(flatten)]
    pub(crate) fields: FieldArgs,
    /// Start from the example patient before applying field flags
    #[arg(long)]
    pub(crate) example: bool,
    /// Download the PDF report after a successful prediction
    #[arg(long)]
    pub(crate) report: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    pub(crate) fields: FieldArgs,
    /// Start from the example patient before applying field flags
    #[arg(long)]
    pub(crate) example: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = apply_overrides(AppConfig::load()?, &cli.overrides)?;

    telemetry::init(&config.telemetry)?;
    info!(?config.environment, predictor = %config.predictor.base_url, "heart risk console starting");

    let console = Console::new(config);
    match cli.command.unwrap_or(Command::Session) {
        Command::Session => session::run(console).await,
        Command::Predict(args) => console::run_predict(&console, args).await,
        Command::Validate(args) => console::run_validate(&console, args),
        Command::Schema => {
            print!("{}", SchemaTable);
            Ok(())
        }
        Command::Draft {
            command: DraftCommand::Show,
        } => console::run_draft_show(&console),
        Command::Draft {
            command: DraftCommand::Clear,
        } => console::run_draft_clear(&console),
    }
}

fn apply_overrides(
    mut config: AppConfig,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, AppError> {
    if let Some(url) = &overrides.predictor_url {
        config.predictor = PredictorConfig::new(url.clone())?;
    }
    if let Some(path) = &overrides.draft_path {
        config.drafts.path = Some(path.clone());
    }
    if overrides.no_draft {
        config.drafts.path = None;
    }
    if let Some(dir) = &overrides.report_dir {
        config.reports.output_dir = dir.clone();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_flags_become_edits_in_field_order() {
        let cli = Cli::try_parse_from([
            "heart-risk",
            "predict",
            "--thal",
            "2",
            "--age",
            "52",
            "--report",
        ])
        .expect("arguments parse");

        let Some(Command::Predict(args)) = cli.command else {
            panic!("expected predict command");
        };
        assert!(args.report);
        assert!(!args.example);
        assert_eq!(
            args.fields.edits(),
            vec![
                (FieldName::Age, "52".to_string()),
                (FieldName::Thal, "2".to_string())
            ]
        );
    }

    #[test]
    fn global_overrides_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "heart-risk",
            "validate",
            "--example",
            "--no-draft",
            "--predictor-url",
            "https://risk.example.org",
        ])
        .expect("arguments parse");

        assert!(cli.overrides.no_draft);
        assert_eq!(
            cli.overrides.predictor_url.as_deref(),
            Some("https://risk.example.org")
        );
    }

    #[test]
    fn session_is_the_default_command() {
        let cli = Cli::try_parse_from(["heart-risk"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
