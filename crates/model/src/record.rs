//! Type-erased records
//!
//! Typed resources are decoded at the API boundary and then erased into a
//! [`Record`] so tables, forms and option lists can work over any resource.

use crate::resource::ResourceKind;
use crate::role::OperatorRole;
use atelier_core::{AppError, AppResult, CellValue};
use serde_json::{Map, Value};

/// A single row of any resource
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: ResourceKind,
    key: String,
    values: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object carrying the resource's key field
    pub fn from_value(kind: ResourceKind, value: Value) -> AppResult<Self> {
        let Value::Object(values) = value else {
            return Err(AppError::invalid_record(kind.slug(), "expected a JSON object"));
        };

        let key = match values.get(kind.key_field()) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(AppError::invalid_record(
                    kind.slug(),
                    format!("missing key field `{}`", kind.key_field()),
                ));
            }
        };

        Ok(Self { kind, key, values })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw wire value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Field value as plain text (empty when absent or null)
    pub fn text(&self, field: &str) -> String {
        match self.values.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Typed cell for a field, interpreted through the catalogue
    pub fn cell(&self, field: &str) -> CellValue {
        match self.kind.field(field) {
            Ok(def) => def.cell(self.values.get(field)),
            Err(_) => CellValue::text(self.text(field)),
        }
    }

    /// Label shown next to the key in option lists
    pub fn label(&self) -> String {
        self.text(self.kind.label_field())
    }

    /// `"{key} - {label}"`, or just the key when the label is blank
    pub fn option_label(&self) -> String {
        let label = self.label();
        if label.trim().is_empty() {
            self.key.clone()
        } else {
            ResourceKind::option_label(&self.key, &label)
        }
    }

    /// Operator role, for operator records
    pub fn role(&self) -> Option<OperatorRole> {
        match (self.kind, self.values.get("fonction")) {
            (ResourceKind::Operator, Some(Value::String(s))) => Some(OperatorRole::parse(s)),
            _ => None,
        }
    }

    /// Wire representation
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}
