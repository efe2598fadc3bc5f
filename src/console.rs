//! Plumbing shared by the one-shot commands and the interactive session.

use crate::cli::{PredictArgs, ValidateArgs};
use crate::render::{FormScreen, PanelScreen, ValidationSummary};
use chrono::Local;
use heart_risk::config::AppConfig;
use heart_risk::controller::{FormController, FormState, Outcome, SubmitStep, TransitionError};
use heart_risk::error::AppError;
use heart_risk::form::{
    validate_all, DraftError, DraftStore, FileDraftStore, FormValues, InMemoryDraftStore,
    FIELD_SCHEMA,
};
use heart_risk::prediction::{
    HttpPredictionClient, PredictionClient, PredictionError, ReportDownload, ReportError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Draft slot selected by configuration; `--no-draft` keeps it in memory.
#[derive(Debug, Clone)]
pub(crate) enum DraftBackend {
    File(FileDraftStore),
    Memory(InMemoryDraftStore),
}

impl DraftBackend {
    pub(crate) fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(FileDraftStore::new(path)),
            None => Self::Memory(InMemoryDraftStore::default()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::File(store) => store.path().display().to_string(),
            Self::Memory(_) => "memory (not persisted)".to_string(),
        }
    }
}

impl DraftStore for DraftBackend {
    fn read_slot(&self) -> Result<Option<String>, DraftError> {
        match self {
            Self::File(store) => store.read_slot(),
            Self::Memory(store) => store.read_slot(),
        }
    }

    fn write_slot(&self, payload: &str) -> Result<(), DraftError> {
        match self {
            Self::File(store) => store.write_slot(payload),
            Self::Memory(store) => store.write_slot(payload),
        }
    }

    fn clear(&self) -> Result<(), DraftError> {
        match self {
            Self::File(store) => store.clear(),
            Self::Memory(store) => store.clear(),
        }
    }
}

pub(crate) type ConsoleController = FormController<HttpPredictionClient, DraftBackend>;

/// Long-lived collaborators built once from configuration.
pub(crate) struct Console {
    client: Arc<HttpPredictionClient>,
    drafts: Arc<DraftBackend>,
    report_dir: PathBuf,
}

impl Console {
    pub(crate) fn new(config: AppConfig) -> Self {
        Self {
            client: Arc::new(HttpPredictionClient::new(config.predictor.base_url)),
            drafts: Arc::new(DraftBackend::from_path(config.drafts.path)),
            report_dir: config.reports.output_dir,
        }
    }

    pub(crate) fn controller(&self) -> ConsoleController {
        FormController::new(Arc::clone(&self.client), Arc::clone(&self.drafts))
    }

    pub(crate) fn drafts(&self) -> &DraftBackend {
        &self.drafts
    }

    pub(crate) fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    pub(crate) fn predictor_url(&self) -> &str {
        self.client.base_url()
    }
}

/// Submit with the prediction request running on the blocking pool.
pub(crate) async fn drive_submit<C, S>(
    controller: &mut FormController<C, S>,
) -> Result<FormState, TransitionError>
where
    C: PredictionClient + 'static,
    S: DraftStore + 'static,
{
    let ticket = match controller.begin_submit()? {
        SubmitStep::Rejected => return Ok(controller.state()),
        SubmitStep::Pending(ticket) => ticket,
    };

    let client = controller.client();
    let values = ticket.values().clone();
    debug!("dispatching prediction request");
    let outcome = tokio::task::spawn_blocking(move || client.predict(&values))
        .await
        .unwrap_or_else(|err| Err(PredictionError::Network(err.to_string())));
    controller.complete_submit(ticket, outcome)
}

/// Request the report for the displayed result, off the async runtime.
pub(crate) async fn drive_report<C, S>(
    controller: &mut FormController<C, S>,
) -> Result<Option<ReportDownload>, TransitionError>
where
    C: PredictionClient + 'static,
    S: DraftStore + 'static,
{
    let ticket = controller.begin_report_download(Local::now())?;
    let client = controller.client();
    let request = ticket.request().clone();
    let outcome = tokio::task::spawn_blocking(move || client.generate_report(&request))
        .await
        .unwrap_or_else(|err| Err(ReportError::Network(err.to_string())));
    Ok(controller.complete_report_download(ticket, outcome))
}

pub(crate) fn save_download(dir: &Path, download: &ReportDownload) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&download.file_name);
    fs::write(&path, &download.artifact.bytes)?;
    info!(path = %path.display(), bytes = download.artifact.bytes.len(), "report saved");
    Ok(path)
}

pub(crate) async fn run_predict(console: &Console, args: PredictArgs) -> Result<(), AppError> {
    let mut controller = console.controller();
    if args.example {
        controller.load_example()?;
    }
    for (field, value) in args.fields.edits() {
        controller.edit_field(field, value)?;
    }

    match drive_submit(&mut controller).await? {
        FormState::Displaying(Outcome::Success) => {}
        FormState::Displaying(Outcome::Error) => {
            let message = controller.panel().error().unwrap_or_default().to_string();
            return Err(AppError::Prediction(message));
        }
        _ => {
            let view = controller.view();
            print!("{}", FormScreen(&view));
            let invalid = view.fields.iter().filter(|field| field.invalid.is_some()).count();
            return Err(AppError::InvalidForm(invalid));
        }
    }

    print!("{}", PanelScreen(controller.panel()));

    if args.report {
        match drive_report(&mut controller).await? {
            Some(download) => {
                let path = save_download(console.report_dir(), &download)?;
                println!("\nReport saved to {}", path.display());
            }
            None => {
                for alert in controller.take_alerts() {
                    eprintln!("{alert}");
                }
                return Err(AppError::Report);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_validate(console: &Console, args: ValidateArgs) -> Result<(), AppError> {
    let mut values = if args.example {
        FormValues::example()
    } else {
        console.drafts().load()
    };
    for (field, value) in args.fields.edits() {
        values.set(field, value);
    }

    let report = validate_all(&FIELD_SCHEMA, &values);
    print!(
        "{}",
        ValidationSummary {
            values: &values,
            report: &report,
        }
    );
    if report.is_valid() {
        Ok(())
    } else {
        Err(AppError::InvalidForm(report.failures().count()))
    }
}

pub(crate) fn run_draft_show(console: &Console) -> Result<(), AppError> {
    println!("Draft location: {}", console.drafts().describe());
    match console.drafts().try_load()? {
        Some(values) if !values.is_blank() => {
            for (name, value) in values.non_empty() {
                println!("- {:<9} {}", name.as_str(), value);
            }
        }
        _ => println!("No draft stored"),
    }
    Ok(())
}

pub(crate) fn run_draft_clear(console: &Console) -> Result<(), AppError> {
    console.drafts().clear()?;
    println!("Draft cleared");
    Ok(())
}
