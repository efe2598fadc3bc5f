//! Plain-text screens for the console, written straight to any formatter.

use heart_risk::controller::{FormView, ResultPanel};
use heart_risk::form::{FieldName, FormValues, ValidationReport, FIELD_SCHEMA};
use heart_risk::presenter::{ResultView, DETAIL_NOTES};
use std::fmt;

const BAR_WIDTH: usize = 30;

fn shown(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Field table with accepted ranges and codes.
pub(crate) struct SchemaTable;

impl fmt::Display for SchemaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heart disease risk factors")?;
        for spec in FIELD_SCHEMA.iter() {
            writeln!(
                f,
                "- {:<9} {:<22} {}",
                spec.name.as_str(),
                spec.describe(),
                spec.name.label()
            )?;
        }
        Ok(())
    }
}

pub(crate) struct FormScreen<'a>(pub(crate) &'a FormView);

impl fmt::Display for FormScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "Form [{}]", view.state)?;
        for field in &view.fields {
            write!(
                f,
                "  {:<9} {:<22} {}",
                field.name.as_str(),
                field.name.spec().describe(),
                shown(&field.value)
            )?;
            if let Some(message) = &field.invalid {
                write!(f, "  ! {message}")?;
            }
            writeln!(f)?;
        }
        if let Some(error) = &view.form_error {
            writeln!(f, "{error}")?;
        }
        let busy = if view.busy { " (busy)" } else { "" };
        writeln!(f, "[{}]{}", view.submit_label, busy)?;
        if view.report_pending {
            writeln!(f, "Generating report...")?;
        }
        Ok(())
    }
}

pub(crate) struct PanelScreen<'a>(pub(crate) &'a ResultPanel);

impl fmt::Display for PanelScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ResultPanel::Hidden => Ok(()),
            ResultPanel::Result(view) => ResultScreen(view).fmt(f),
            ResultPanel::Error(message) => writeln!(f, "Error: {message}"),
        }
    }
}

pub(crate) struct ResultScreen<'a>(pub(crate) &'a ResultView);

impl fmt::Display for ResultScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "{}  [{}]", view.headline, view.badge)?;
        writeln!(f, "{}", view.summary)?;

        let filled = ((view.indicator.at(1.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        writeln!(
            f,
            "Probability {} |{}{}|",
            view.probability_text,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled)
        )?;

        let actions: Vec<&str> = view.actions.iter().map(|action| action.label()).collect();
        writeln!(f, "Next: {}", actions.join(" | "))
    }
}

/// Body of the "learn more" modal.
pub(crate) struct DetailNotes;

impl fmt::Display for DetailNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "About this prediction")?;
        for note in DETAIL_NOTES {
            writeln!(f, "- {note}")?;
        }
        Ok(())
    }
}

pub(crate) struct ValidationSummary<'a> {
    pub(crate) values: &'a FormValues,
    pub(crate) report: &'a ValidationReport,
}

impl fmt::Display for ValidationSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.report.is_valid() {
            return writeln!(f, "All {} fields are valid", FieldName::COUNT);
        }
        for (name, message) in self.report.failures() {
            writeln!(
                f,
                "- {:<9} {:<8} {}",
                name.as_str(),
                shown(self.values.get(name)),
                message
            )?;
        }
        Ok(())
    }
}
