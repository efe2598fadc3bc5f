use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk-factor inputs collected by the form, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

impl FieldName {
    pub const COUNT: usize = 13;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Age,
            Self::Sex,
            Self::Cp,
            Self::Trestbps,
            Self::Chol,
            Self::Fbs,
            Self::Restecg,
            Self::Thalach,
            Self::Exang,
            Self::Oldpeak,
            Self::Slope,
            Self::Ca,
            Self::Thal,
        ]
    }

    /// Wire name used in request bodies and the persisted draft.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Cp => "cp",
            Self::Trestbps => "trestbps",
            Self::Chol => "chol",
            Self::Fbs => "fbs",
            Self::Restecg => "restecg",
            Self::Thalach => "thalach",
            Self::Exang => "exang",
            Self::Oldpeak => "oldpeak",
            Self::Slope => "slope",
            Self::Ca => "ca",
            Self::Thal => "thal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "Age (years)",
            Self::Sex => "Sex (1 = male, 0 = female)",
            Self::Cp => "Chest pain type",
            Self::Trestbps => "Resting blood pressure (mm Hg)",
            Self::Chol => "Serum cholesterol (mg/dl)",
            Self::Fbs => "Fasting blood sugar > 120 mg/dl",
            Self::Restecg => "Resting ECG results",
            Self::Thalach => "Maximum heart rate achieved",
            Self::Exang => "Exercise induced angina",
            Self::Oldpeak => "ST depression induced by exercise",
            Self::Slope => "Slope of peak exercise ST segment",
            Self::Ca => "Major vessels colored by fluoroscopy",
            Self::Thal => "Thalassemia",
        }
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SCHEMA[self as usize]
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|name| name.as_str() == needle)
            .ok_or_else(|| UnknownField(raw.trim().to_string()))
    }
}

/// Constraint applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    /// Enumerated numeric codes.
    Enum { allowed: &'static [f64] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn range(name: FieldName, min: f64, max: f64) -> Self {
        Self {
            name,
            kind: FieldKind::Range { min, max },
        }
    }

    const fn choice(name: FieldName, allowed: &'static [f64]) -> Self {
        Self {
            name,
            kind: FieldKind::Enum { allowed },
        }
    }

    /// Human readable constraint, e.g. `[1, 120]` or `{0, 1}`.
    pub fn describe(&self) -> String {
        match self.kind {
            FieldKind::Range { min, max } => format!("[{min}, {max}]"),
            FieldKind::Enum { allowed } => {
                let codes: Vec<String> = allowed.iter().map(|code| code.to_string()).collect();
                format!("{{{}}}", codes.join(", "))
            }
        }
    }
}

/// One entry per field, indexed by `FieldName as usize`.
pub const FIELD_SCHEMA: [FieldSpec; FieldName::COUNT] = [
    FieldSpec::range(FieldName::Age, 1.0, 120.0),
    FieldSpec::choice(FieldName::Sex, &[0.0, 1.0]),
    FieldSpec::choice(FieldName::Cp, &[0.0, 1.0, 2.0, 3.0]),
    FieldSpec::range(FieldName::Trestbps, 80.0, 250.0),
    FieldSpec::range(FieldName::Chol, 100.0, 600.0),
    FieldSpec::choice(FieldName::Fbs, &[0.0, 1.0]),
    FieldSpec::choice(FieldName::Restecg, &[0.0, 1.0, 2.0]),
    FieldSpec::range(FieldName::Thalach, 60.0, 220.0),
    FieldSpec::choice(FieldName::Exang, &[0.0, 1.0]),
    FieldSpec::range(FieldName::Oldpeak, 0.0, 10.0),
    FieldSpec::choice(FieldName::Slope, &[0.0, 1.0, 2.0]),
    FieldSpec::choice(FieldName::Ca, &[0.0, 1.0, 2.0, 3.0, 4.0]),
    FieldSpec::choice(FieldName::Thal, &[1.0, 2.0, 3.0]),
];

/// Sample patient used by the "load example" action.
pub const EXAMPLE_VALUES: [(FieldName, &str); FieldName::COUNT] = [
    (FieldName::Age, "63"),
    (FieldName::Sex, "1"),
    (FieldName::Cp, "3"),
    (FieldName::Trestbps, "145"),
    (FieldName::Chol, "233"),
    (FieldName::Fbs, "1"),
    (FieldName::Restecg, "0"),
    (FieldName::Thalach, "150"),
    (FieldName::Exang, "0"),
    (FieldName::Oldpeak, "2.3"),
    (FieldName::Slope, "0"),
    (FieldName::Ca, "0"),
    (FieldName::Thal, "1"),
];
