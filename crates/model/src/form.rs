//! Create/edit forms
//!
//! Forms hold raw text per field. Submitting validates every field against
//! its descriptor, then converts the text into a JSON payload that is
//! decoded through the resource's typed schema before anything is sent.

use crate::autocomplete::AutocompleteError;
use crate::entities::decode_record;
use crate::field::FieldKind;
use crate::record::Record;
use crate::resource::ResourceKind;
use atelier_core::AppResult;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Whether a form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Allowed values per reference field, from the last-fetched option lists
pub type ReferenceOptions = HashMap<&'static str, Vec<String>>;

// ============================================================================
// Form Errors
// ============================================================================

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

// ============================================================================
// Form Values
// ============================================================================

/// Raw text buffers for every field of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    kind: ResourceKind,
    mode: FormMode,
    values: BTreeMap<String, String>,
}

impl FormValues {
    /// Empty create form
    pub fn new(kind: ResourceKind) -> Self {
        let values = kind
            .fields()
            .iter()
            .map(|f| (f.name.to_string(), String::new()))
            .collect();
        Self {
            kind,
            mode: FormMode::Create,
            values,
        }
    }

    /// Edit form pre-filled from a record
    pub fn from_record(record: &Record) -> Self {
        let kind = record.kind();
        let values = kind
            .fields()
            .iter()
            .map(|f| {
                let text = record.get(f.name).map(|v| f.to_input(v)).unwrap_or_default();
                (f.name.to_string(), text)
            })
            .collect();
        Self {
            kind,
            mode: FormMode::Edit,
            values,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Whether a field can be edited in the current mode
    pub fn is_editable(&self, field: &str) -> bool {
        !(self.mode == FormMode::Edit && field == self.kind.key_field())
    }

    /// Key of the record being edited
    pub fn key(&self) -> &str {
        self.get(self.kind.key_field())
    }

    /// Check every field, and reference fields against known options
    pub fn validate(&self, references: Option<&ReferenceOptions>) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        for field in self.kind.fields() {
            let raw = self.get(field.name);
            if let Err(message) = field.check(raw) {
                errors.insert(field.name, message);
                continue;
            }

            let allowed = match (&field.kind, references) {
                (FieldKind::Reference { .. }, Some(options)) => options.get(field.name),
                _ => None,
            };
            if let Some(allowed) = allowed {
                let value = raw.trim();
                if !value.is_empty() && !allowed.iter().any(|a| a == value) {
                    errors.insert(field.name, AutocompleteError::InvalidOption.message());
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate and build the JSON body, omitting blank optional fields
    pub fn to_payload(&self, references: Option<&ReferenceOptions>) -> Result<Value, FormErrors> {
        self.validate(references)?;

        let mut payload = Map::new();
        for field in self.kind.fields() {
            if let Some(value) = field.to_wire(self.get(field.name)) {
                payload.insert(field.name.to_string(), value);
            }
        }
        Ok(Value::Object(payload))
    }

    /// Validate, build the payload and decode it through the typed schema
    pub fn to_record(&self, references: Option<&ReferenceOptions>) -> SubmitResult {
        let payload = self.to_payload(references).map_err(SubmitError::Invalid)?;
        decode_record(self.kind, payload).map_err(SubmitError::Schema)
    }
}

/// Outcome of preparing a form for submission
pub type SubmitResult = Result<Record, SubmitError>;

/// Why a form could not be submitted
#[derive(Debug)]
pub enum SubmitError {
    /// Field-level problems to show inline
    Invalid(FormErrors),
    /// The payload did not fit the typed schema
    Schema(atelier_core::AppError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Invalid(errors) => write!(f, "{}", errors),
            SubmitError::Schema(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Parse `field=value` assignments into a form
pub fn apply_assignments(form: &mut FormValues, assignments: &[String]) -> AppResult<()> {
    for assignment in assignments {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            atelier_core::AppError::validation(format!(
                "Expected field=value, got '{}'",
                assignment
            ))
        })?;
        let field = form.kind().field(field.trim())?;
        if !form.is_editable(field.name) {
            return Err(atelier_core::AppError::field_validation(
                form.kind().slug(),
                field.name,
                "Key fields cannot be changed",
            ));
        }
        form.set(field.name, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn work_order_form() -> FormValues {
        let mut form = FormValues::new(ResourceKind::WorkOrder);
        form.set("codeOf", "OF-100");
        form.set("code_client", "C1");
        form.set("article", "Axe 40mm");
        form.set("quantite", "250");
        form.set("date_lancement", "2024-04-02T08:00");
        form.set("statut", "planifie");
        form
    }

    #[test]
    fn test_new_form_is_blank_create() {
        let form = FormValues::new(ResourceKind::Cause);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.get("code_causse"), "");
        assert_eq!(form.get("libelle"), "");
        assert!(form.is_editable("code_causse"));
    }

    #[test]
    fn test_validation_collects_field_errors() {
        let mut form = work_order_form();
        form.set("quantite", "0");
        form.set("article", "");

        let errors = form.validate(None).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("quantite"), Some("Minimum value is 1"));
        assert_eq!(errors.get("article"), Some("This field is required"));
    }

    #[test]
    fn test_reference_checked_against_options() {
        let form = work_order_form();
        let mut options = ReferenceOptions::new();
        options.insert("code_client", vec!["C2".to_string()]);

        let errors = form.validate(Some(&options)).unwrap_err();
        assert_eq!(errors.get("code_client"), Some("Please select a valid option"));

        options.insert("code_client", vec!["C1".to_string()]);
        assert!(form.validate(Some(&options)).is_ok());
    }

    #[test]
    fn test_payload_serialises_and_omits_blanks() {
        let payload = work_order_form().to_payload(None).unwrap();
        assert_eq!(
            payload,
            json!({
                "codeOf": "OF-100",
                "code_client": "C1",
                "article": "Axe 40mm",
                "quantite": 250,
                "date_lancement": "2024-04-02 08:00:00",
                "statut": "planifie"
            })
        );
    }

    #[test]
    fn test_to_record_decodes_through_schema() {
        let record = work_order_form().to_record(None).unwrap();
        assert_eq!(record.key(), "OF-100");
        assert_eq!(record.kind(), ResourceKind::WorkOrder);
    }

    #[test]
    fn test_edit_form_round_trips_record() {
        let record = work_order_form().to_record(None).unwrap();
        let form = FormValues::from_record(&record);

        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.key(), "OF-100");
        assert_eq!(form.get("date_lancement"), "2024-04-02T08:00");
        assert_eq!(form.get("date_echeance"), "");
        assert!(!form.is_editable("codeOf"));
        assert!(form.is_editable("article"));
    }

    #[test]
    fn test_apply_assignments() {
        let mut form = FormValues::new(ResourceKind::Cause);
        apply_assignments(
            &mut form,
            &["code_causse=CA9".to_string(), "libelle=Vibration".to_string()],
        )
        .unwrap();
        assert_eq!(form.get("libelle"), "Vibration");

        let err = apply_assignments(&mut form, &["colour=red".to_string()]).unwrap_err();
        assert!(err.is_not_found());
        assert!(apply_assignments(&mut form, &["libelle".to_string()]).is_err());

        let record = form.to_record(None).unwrap();
        let mut edit = FormValues::from_record(&record);
        let err = apply_assignments(&mut edit, &["code_causse=CA10".to_string()]).unwrap_err();
        assert!(err.is_validation());
    }
}
