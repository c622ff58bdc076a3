//! Field descriptors for resource properties
//!
//! A [`FieldDef`] describes one wire key of a resource: how it is labelled,
//! which input widget edits it, how raw form text is checked, and whether
//! it points at another resource.

use crate::resource::ResourceKind;
use crate::role::OperatorRole;
use crate::wire;
use atelier_core::types::{NOT_A_NUMBER, parse_number};
use atelier_core::{CellValue, Validation};
use heck::ToTitleCase;
use serde_json::Value;

// ============================================================================
// Field Kind
// ============================================================================

/// Value domain of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line text
    Text,
    /// Multi-line text
    LongText,
    /// Whole number
    Integer,
    /// Decimal number
    Decimal,
    /// Calendar date
    Date,
    /// Date and time
    DateTime,
    /// One of a fixed list of values
    Choice(&'static [&'static str]),
    /// Key of another resource, optionally restricted to operators with a role
    Reference {
        target: ResourceKind,
        role: Option<OperatorRole>,
    },
    /// Operator job function
    Role,
}

impl FieldKind {
    /// Whether values are numbers on the wire
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Decimal)
    }

    /// Referenced resource, if any
    pub fn reference_target(&self) -> Option<ResourceKind> {
        match self {
            FieldKind::Reference { target, .. } => Some(*target),
            _ => None,
        }
    }
}

// ============================================================================
// Field Definition
// ============================================================================

/// Describes a single resource field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Wire key
    pub name: &'static str,

    /// Display label (falls back to the title-cased wire key)
    pub label: Option<&'static str>,

    /// Value domain
    pub kind: FieldKind,

    /// Whether the field must be filled in
    pub required: bool,

    /// Whether this is the resource's natural key
    pub is_key: bool,

    /// Extra validation rules applied to non-blank input
    pub validations: Vec<Validation>,

    /// Whether the field appears as a table column
    pub show_in_list: bool,

    /// Input placeholder text
    pub placeholder: Option<&'static str>,
}

impl FieldDef {
    /// Create a new optional field
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label: None,
            show_in_list: !matches!(kind, FieldKind::LongText),
            kind,
            required: false,
            is_key: false,
            validations: Vec::new(),
            placeholder: None,
        }
    }

    /// Create a required text key field
    pub fn key(name: &'static str) -> Self {
        let mut field = Self::new(name, FieldKind::Text).required();
        field.is_key = true;
        field
    }

    /// Create a required reference field
    pub fn reference(name: &'static str, target: ResourceKind) -> Self {
        Self::new(name, FieldKind::Reference { target, role: None }).required()
    }

    /// Create a required reference to operators holding a role
    pub fn operator(name: &'static str, role: OperatorRole) -> Self {
        Self::new(
            name,
            FieldKind::Reference {
                target: ResourceKind::Operator,
                role: Some(role),
            },
        )
        .required()
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a validation rule
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the placeholder text
    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Hide the field from table columns
    pub fn hidden_in_list(mut self) -> Self {
        self.show_in_list = false;
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Get the display label
    pub fn display_label(&self) -> String {
        match self.label {
            Some(label) => label.to_string(),
            None => self.name.to_title_case(),
        }
    }

    /// Check raw form input, returning the first failing message
    pub fn check(&self, raw: &str) -> Result<(), String> {
        let value = raw.trim();
        if value.is_empty() {
            return if self.required {
                Validation::Required.check(value)
            } else {
                Ok(())
            };
        }

        match &self.kind {
            FieldKind::Integer => {
                if value.parse::<i64>().is_err() {
                    return Err("Must be a whole number".to_string());
                }
            }
            FieldKind::Decimal => {
                if parse_number(value).is_none() {
                    return Err(NOT_A_NUMBER.to_string());
                }
            }
            FieldKind::Date => {
                if wire::parse_date(value).is_none() {
                    return Err("Must be a valid date".to_string());
                }
            }
            FieldKind::DateTime => {
                if wire::parse_datetime(value).is_none() {
                    return Err("Must be a valid date and time".to_string());
                }
            }
            FieldKind::Choice(options) => {
                if !options.contains(&value) {
                    return Err(Validation::OneOf(
                        options.iter().map(|o| o.to_string()).collect(),
                    )
                    .error_message());
                }
            }
            FieldKind::Text | FieldKind::LongText | FieldKind::Reference { .. } | FieldKind::Role => {}
        }

        self.validations.iter().try_for_each(|v| v.check(value))
    }

    /// Convert checked form input into its JSON wire value
    ///
    /// Blank input maps to `None` so optional fields can be omitted.
    pub fn to_wire(&self, raw: &str) -> Option<Value> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        let json = match &self.kind {
            FieldKind::Integer => Value::from(value.parse::<i64>().ok()?),
            FieldKind::Decimal => Value::from(parse_number(value)?),
            FieldKind::Date => Value::from(wire::format_date(&wire::parse_date(value)?)),
            FieldKind::DateTime => {
                Value::from(wire::format_datetime(&wire::parse_datetime(value)?))
            }
            FieldKind::Role => Value::from(OperatorRole::parse(value).wire_value()),
            FieldKind::Text
            | FieldKind::LongText
            | FieldKind::Choice(_)
            | FieldKind::Reference { .. } => Value::from(value),
        };
        Some(json)
    }

    /// Convert a wire value into form input text
    pub fn to_input(&self, value: &Value) -> String {
        match (&self.kind, value) {
            (_, Value::Null) => String::new(),
            (FieldKind::Date, Value::String(s)) => wire::parse_date(s)
                .map(|d| wire::format_date(&d))
                .unwrap_or_else(|| s.clone()),
            (FieldKind::DateTime, Value::String(s)) => wire::parse_datetime(s)
                .map(|dt| wire::format_datetime_input(&dt))
                .unwrap_or_else(|| s.clone()),
            (FieldKind::Role, Value::String(s)) => OperatorRole::parse(s).wire_value().to_string(),
            (_, Value::String(s)) => s.clone(),
            (_, other) => other.to_string(),
        }
    }

    /// Typed cell value for tables
    pub fn cell(&self, value: Option<&Value>) -> CellValue {
        let Some(value) = value else {
            return CellValue::Empty;
        };
        match (&self.kind, value) {
            (_, Value::Null) => CellValue::Empty,
            (_, Value::Bool(b)) => CellValue::Bool(*b),
            (_, Value::Number(n)) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
            (FieldKind::Integer | FieldKind::Decimal, Value::String(s)) => parse_number(s)
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::text(s.as_str())),
            (FieldKind::Date, Value::String(s)) => wire::parse_date(s)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::text(s.as_str())),
            (FieldKind::DateTime, Value::String(s)) => wire::parse_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::text(s.as_str())),
            (FieldKind::Role, Value::String(s)) => {
                CellValue::text(OperatorRole::parse(s).label().to_string())
            }
            (_, Value::String(s)) => CellValue::text(s.as_str()),
            (_, other) => CellValue::text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_label_fallback() {
        let field = FieldDef::new("date_mise_en_service", FieldKind::Date);
        assert_eq!(field.display_label(), "Date Mise En Service");
        assert_eq!(field.with_label("Mise en service").display_label(), "Mise en service");
    }

    #[test]
    fn test_long_text_hidden_from_list() {
        assert!(!FieldDef::new("description", FieldKind::LongText).show_in_list);
        assert!(FieldDef::new("designation", FieldKind::Text).show_in_list);
    }

    #[test]
    fn test_check_required_and_optional() {
        let required = FieldDef::new("article", FieldKind::Text).required();
        assert_eq!(required.check(" "), Err("This field is required".to_string()));

        let optional = FieldDef::new("quantite_rebut", FieldKind::Integer)
            .with_validation(Validation::Min(0.0));
        assert!(optional.check("").is_ok());
        assert!(optional.check("-1").is_err());
        assert_eq!(optional.check("1.5"), Err("Must be a whole number".to_string()));
    }

    #[test]
    fn test_check_dates_and_choices() {
        let due = FieldDef::new("date_echeance", FieldKind::Date);
        assert!(due.check("2024-02-30").is_err());
        assert!(due.check("2024-02-29").is_ok());

        let unit = FieldDef::new("unite", FieldKind::Choice(&["kg", "m"]));
        assert!(unit.check("kg").is_ok());
        assert_eq!(unit.check("t"), Err("Must be one of: kg, m".to_string()));
    }

    #[test]
    fn test_to_wire_conversions() {
        let dt = FieldDef::new("date_debut", FieldKind::DateTime);
        assert_eq!(dt.to_wire("2024-04-01T09:15"), Some(Value::from("2024-04-01 09:15:00")));
        assert_eq!(dt.to_wire(""), None);

        let qty = FieldDef::new("quantite", FieldKind::Decimal);
        assert_eq!(qty.to_wire("2,5"), Some(Value::from(2.5)));

        let role = FieldDef::new("fonction", FieldKind::Role);
        assert_eq!(role.to_wire("Contrôleur"), Some(Value::from("controleur")));
    }

    #[test]
    fn test_to_input_for_datetime() {
        let dt = FieldDef::new("date_debut", FieldKind::DateTime);
        assert_eq!(dt.to_input(&Value::from("2024-04-01 09:15:00")), "2024-04-01T09:15");
        assert_eq!(dt.to_input(&Value::Null), "");

        let qty = FieldDef::new("quantite", FieldKind::Integer);
        assert_eq!(qty.to_input(&Value::from(12)), "12");
    }

    #[test]
    fn test_cell_values() {
        let qty = FieldDef::new("stock_min", FieldKind::Decimal);
        assert_eq!(qty.cell(Some(&Value::from("4.50"))), CellValue::Number(4.5));
        assert_eq!(qty.cell(None), CellValue::Empty);

        let role = FieldDef::new("fonction", FieldKind::Role);
        assert_eq!(
            role.cell(Some(&Value::from("controleur"))),
            CellValue::Text("Contrôleur".to_string())
        );
    }
}
