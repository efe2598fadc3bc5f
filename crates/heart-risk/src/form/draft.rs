//! Persistence of in-progress form values between sessions.
//!
//! A draft is a single named slot holding a JSON object of the fields that
//! carried a value at the last edit. Saving overwrites the slot; loading never
//! fails, a missing or corrupt slot simply yields an empty form.

use super::values::FormValues;
use directories::BaseDirs;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub const DRAFT_DIR_NAME: &str = ".heart-risk";
pub const DRAFT_FILE_NAME: &str = "heart-disease-form.json";

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft storage unavailable at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("stored draft is not valid: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Storage slot for the serialized draft.
pub trait DraftStore: Send + Sync {
    fn read_slot(&self) -> Result<Option<String>, DraftError>;
    fn write_slot(&self, payload: &str) -> Result<(), DraftError>;
    fn clear(&self) -> Result<(), DraftError>;

    /// Persist the non-empty subset of `values`, replacing any previous draft.
    fn save(&self, values: &FormValues) -> Result<(), DraftError> {
        let snapshot: Map<String, Value> = values
            .non_empty()
            .map(|(name, value)| (name.as_str().to_string(), Value::String(value.to_string())))
            .collect();
        let payload = serde_json::to_string(&snapshot)?;
        self.write_slot(&payload)?;
        debug!(fields = snapshot.len(), "draft saved");
        Ok(())
    }

    /// Restore the stored draft, or an empty form when nothing usable is stored.
    fn load(&self) -> FormValues {
        match self.try_load() {
            Ok(Some(values)) => values,
            Ok(None) => FormValues::new(),
            Err(err) => {
                warn!(error = %err, "discarding unreadable draft");
                FormValues::new()
            }
        }
    }

    fn try_load(&self) -> Result<Option<FormValues>, DraftError> {
        let Some(payload) = self.read_slot()? else {
            return Ok(None);
        };
        let values = serde_json::from_str::<FormValues>(&payload)?;
        Ok(Some(values))
    }
}

/// Draft slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot under the OS config directory, when one can be resolved.
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| {
            dirs.config_dir()
                .join(DRAFT_DIR_NAME)
                .join(DRAFT_FILE_NAME)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> DraftError {
        DraftError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DraftStore for FileDraftStore {
    fn read_slot(&self) -> Result<Option<String>, DraftError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write_slot(&self, payload: &str) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        fs::write(&self.path, payload).map_err(|err| self.io_error(err))
    }

    fn clear(&self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// Process-local slot, used when persistence is disabled and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDraftStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryDraftStore {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.slot.lock().expect("draft mutex poisoned").clone()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn read_slot(&self) -> Result<Option<String>, DraftError> {
        Ok(self.payload())
    }

    fn write_slot(&self, payload: &str) -> Result<(), DraftError> {
        *self.slot.lock().expect("draft mutex poisoned") = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        *self.slot.lock().expect("draft mutex poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldName;

    #[test]
    fn save_omits_empty_fields() {
        let store = InMemoryDraftStore::default();
        let mut values = FormValues::new();
        values.set(FieldName::Age, "58");
        values.set(FieldName::Oldpeak, "1.4");

        store.save(&values).expect("save succeeds");

        let payload = store.payload().expect("slot written");
        assert_eq!(payload, r#"{"age":"58","oldpeak":"1.4"}"#);
    }

    #[test]
    fn load_round_trips_non_empty_subset() {
        let store = InMemoryDraftStore::default();
        let mut values = FormValues::example();
        values.set(FieldName::Ca, "");
        values.set(FieldName::Sex, "");

        store.save(&values).expect("save succeeds");
        let restored = store.load();

        assert_eq!(restored, values);
        assert_eq!(restored.non_empty().count(), FieldName::COUNT - 2);
    }

    #[test]
    fn save_overwrites_previous_draft() {
        let store = InMemoryDraftStore::default();
        store.save(&FormValues::example()).expect("first save");

        let mut values = FormValues::new();
        values.set(FieldName::Thal, "2");
        store.save(&values).expect("second save");

        let restored = store.load();
        assert_eq!(restored.get(FieldName::Thal), "2");
        assert_eq!(restored.get(FieldName::Age), "");
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        for payload in ["{not json", "[1,2,3]", r#"{"age":["63"]}"#, ""] {
            let store = InMemoryDraftStore::with_payload(payload);
            assert!(store.load().is_blank(), "payload {payload:?} should be discarded");
            assert!(matches!(store.try_load(), Err(DraftError::Corrupt(_))));
        }
    }

    #[test]
    fn missing_slot_loads_empty() {
        let store = InMemoryDraftStore::default();
        assert!(matches!(store.try_load(), Ok(None)));
        assert!(store.load().is_blank());
    }
}
