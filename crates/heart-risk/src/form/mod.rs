pub mod draft;
pub mod schema;
pub mod validation;
pub mod values;

pub use draft::{DraftError, DraftStore, FileDraftStore, InMemoryDraftStore};
pub use schema::{FieldKind, FieldName, FieldSpec, UnknownField, EXAMPLE_VALUES, FIELD_SCHEMA};
pub use validation::{
    validate_all, validate_field, ValidationReport, ValidationResult, INVALID_CHOICE_MESSAGE,
    REQUIRED_MESSAGE,
};
pub use values::{parse_number, FormValues};
