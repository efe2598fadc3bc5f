use super::schema::{FieldKind, FieldName, FieldSpec};
use super::values::{parse_number, FormValues};
use serde::Serialize;
use std::collections::BTreeMap;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_CHOICE_MESSAGE: &str = "Invalid value";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Apply the rules for one field; the first failing rule wins.
pub fn validate_field(spec: &FieldSpec, raw: &str) -> ValidationResult {
    if raw.trim().is_empty() {
        return ValidationResult::invalid(REQUIRED_MESSAGE);
    }

    match spec.kind {
        FieldKind::Range { min, max } => match parse_number(raw) {
            Some(value) if value >= min && value <= max => ValidationResult::ok(),
            _ => ValidationResult::invalid(format!("Value must be between {min} and {max}")),
        },
        FieldKind::Enum { allowed } => match parse_number(raw) {
            Some(value) if allowed.contains(&value) => ValidationResult::ok(),
            _ => ValidationResult::invalid(INVALID_CHOICE_MESSAGE),
        },
    }
}

pub fn validate_all(specs: &[FieldSpec], values: &FormValues) -> ValidationReport {
    let results = specs
        .iter()
        .map(|spec| (spec.name, validate_field(spec, values.get(spec.name))))
        .collect();
    ValidationReport { results }
}

/// Per-field outcome of a full form validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    results: BTreeMap<FieldName, ValidationResult>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.results.values().all(|result| result.valid)
    }

    pub fn get(&self, name: FieldName) -> Option<&ValidationResult> {
        self.results.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &ValidationResult)> + '_ {
        self.results.iter().map(|(name, result)| (*name, result))
    }

    pub fn failures(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.iter().filter_map(|(name, result)| {
            result
                .message
                .as_deref()
                .filter(|_| !result.valid)
                .map(|message| (name, message))
        })
    }

    pub fn first_invalid(&self) -> Option<FieldName> {
        self.failures().next().map(|(name, _)| name)
    }
}
