//! Core types used throughout Atelier
//!
//! This module contains the value types shared by the model, the table
//! engine and the user interfaces: declarative field validation rules and
//! typed table cell values.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 .\-()]{6,20}$").expect("phone pattern is valid"));

// ============================================================================
// Validation Types
// ============================================================================

/// Field validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Field must have a value
    Required,
    /// Minimum string length
    MinLength(usize),
    /// Maximum string length
    MaxLength(usize),
    /// Minimum numeric value (inclusive)
    Min(f64),
    /// Maximum numeric value (inclusive)
    Max(f64),
    /// Numeric value strictly greater than zero
    Positive,
    /// Regex pattern validation
    Pattern { regex: String, message: String },
    /// Valid email address
    Email,
    /// Valid phone number
    Phone,
    /// Value must be in a list
    OneOf(Vec<String>),
}

impl Validation {
    /// Get a user-friendly error message
    pub fn error_message(&self) -> String {
        match self {
            Validation::Required => "This field is required".to_string(),
            Validation::MinLength(n) => format!("Minimum length is {} characters", n),
            Validation::MaxLength(n) => format!("Maximum length is {} characters", n),
            Validation::Min(n) => format!("Minimum value is {}", n),
            Validation::Max(n) => format!("Maximum value is {}", n),
            Validation::Positive => "Must be greater than 0".to_string(),
            Validation::Pattern { message, .. } => message.clone(),
            Validation::Email => "Must be a valid email address".to_string(),
            Validation::Phone => "Must be a valid phone number".to_string(),
            Validation::OneOf(values) => format!("Must be one of: {}", values.join(", ")),
        }
    }

    /// Check a raw form value against this rule
    ///
    /// Blank values only fail `Required`; every other rule applies to
    /// non-blank input, so optional fields may stay empty.
    pub fn check(&self, raw: &str) -> Result<(), String> {
        let value = raw.trim();

        if value.is_empty() {
            return match self {
                Validation::Required => Err(self.error_message()),
                _ => Ok(()),
            };
        }

        let ok = match self {
            Validation::Required => true,
            Validation::MinLength(n) => value.chars().count() >= *n,
            Validation::MaxLength(n) => value.chars().count() <= *n,
            Validation::Min(n) => match parse_number(value) {
                Some(v) => v >= *n,
                None => return Err(NOT_A_NUMBER.to_string()),
            },
            Validation::Max(n) => match parse_number(value) {
                Some(v) => v <= *n,
                None => return Err(NOT_A_NUMBER.to_string()),
            },
            Validation::Positive => match parse_number(value) {
                Some(v) => v > 0.0,
                None => return Err(NOT_A_NUMBER.to_string()),
            },
            Validation::Pattern { regex, .. } => match Regex::new(regex) {
                Ok(re) => re.is_match(value),
                Err(_) => return Err(format!("Invalid pattern: {}", regex)),
            },
            Validation::Email => EMAIL_RE.is_match(value),
            Validation::Phone => PHONE_RE.is_match(value),
            Validation::OneOf(values) => values.iter().any(|v| v == value),
        };

        if ok { Ok(()) } else { Err(self.error_message()) }
    }
}

impl std::fmt::Display for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Validation::Required => write!(f, "required"),
            Validation::MinLength(n) => write!(f, "min_length({})", n),
            Validation::MaxLength(n) => write!(f, "max_length({})", n),
            Validation::Min(n) => write!(f, "min({})", n),
            Validation::Max(n) => write!(f, "max({})", n),
            Validation::Positive => write!(f, "positive"),
            Validation::Pattern { regex, .. } => write!(f, "pattern({})", regex),
            Validation::Email => write!(f, "email"),
            Validation::Phone => write!(f, "phone"),
            Validation::OneOf(values) => write!(f, "one_of({:?})", values),
        }
    }
}

/// Message used when a numeric rule receives non-numeric input
pub const NOT_A_NUMBER: &str = "Must be a number";

/// Parse a user-entered number, accepting a decimal comma
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// Cell Values
// ============================================================================

/// A typed table cell value, used for sorting, filtering and display
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or null value
    #[default]
    Empty,
    /// Free text
    Text(String),
    /// Integer or decimal number
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time of day
    DateTime(NaiveDateTime),
    /// Boolean flag
    Bool(bool),
}

impl CellValue {
    /// Create a text cell, mapping blank strings to `Empty`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// Check if the cell has no value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Stringified value used for display and free-text filtering
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(v) => v.clone(),
            CellValue::Number(v) => format_number(*v),
            CellValue::Date(d) => d.format("%d/%m/%Y").to_string(),
            CellValue::DateTime(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
            CellValue::Bool(true) => "Yes".to_string(),
            CellValue::Bool(false) => "No".to_string(),
        }
    }

    /// Generic comparison: numeric for numbers, chronological for dates,
    /// lexicographic (case-insensitive first) for text. Empty sorts last.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Greater,
            (_, CellValue::Empty) => Ordering::Less,
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (a, b) => match (a.as_datetime(), b.as_datetime()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => d.and_hms_opt(0, 0, 0),
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Number(_) => 0,
            CellValue::Date(_) | CellValue::DateTime(_) => 1,
            CellValue::Bool(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Empty => 4,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::text(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::text(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::DateTime(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Format a number without a trailing `.0` for integral values
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error_message() {
        assert_eq!(Validation::Required.error_message(), "This field is required");
        assert_eq!(
            Validation::MinLength(2).error_message(),
            "Minimum length is 2 characters"
        );
        assert_eq!(
            Validation::Email.error_message(),
            "Must be a valid email address"
        );
    }

    #[test]
    fn test_required_only_fails_on_blank() {
        assert!(Validation::Required.check("  ").is_err());
        assert!(Validation::Required.check("M1").is_ok());
        assert!(Validation::MinLength(3).check("").is_ok());
        assert!(Validation::Email.check("").is_ok());
    }

    #[test]
    fn test_length_rules_count_chars() {
        assert!(Validation::MinLength(2).check("Év").is_ok());
        assert!(Validation::MinLength(3).check("Év").is_err());
        assert!(Validation::MaxLength(3).check("abcd").is_err());
    }

    #[test]
    fn test_numeric_rules() {
        assert!(Validation::Min(1.0).check("1").is_ok());
        assert!(Validation::Min(1.0).check("0").is_err());
        assert!(Validation::Max(5.0).check("5,0").is_ok());
        assert!(Validation::Positive.check("0").is_err());
        assert!(Validation::Positive.check("0.25").is_ok());
        assert_eq!(
            Validation::Min(0.0).check("abc"),
            Err(NOT_A_NUMBER.to_string())
        );
    }

    #[test]
    fn test_format_rules() {
        assert!(Validation::Email.check("atelier@example.com").is_ok());
        assert!(Validation::Email.check("atelier@").is_err());
        assert!(Validation::Phone.check("+33 1 23 45 67 89").is_ok());
        assert!(Validation::Phone.check("call me").is_err());
        assert!(Validation::OneOf(vec!["kg".into(), "m".into()]).check("kg").is_ok());
        assert!(Validation::OneOf(vec!["kg".into()]).check("g").is_err());

        let pattern = Validation::Pattern {
            regex: "^M[0-9]+$".to_string(),
            message: "Machine codes look like M12".to_string(),
        };
        assert!(pattern.check("M12").is_ok());
        assert_eq!(pattern.check("X1"), Err("Machine codes look like M12".to_string()));
    }

    #[test]
    fn test_parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number("2,5"), Some(2.5));
        assert_eq!(parse_number(" 10 "), Some(10.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("x"), None);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(3.0).display(), "3");
        assert_eq!(CellValue::Number(2.5).display(), "2.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(CellValue::Date(date).display(), "07/03/2024");
        let dt = date.and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(CellValue::DateTime(dt).display(), "07/03/2024 08:30");
        assert_eq!(CellValue::text("  "), CellValue::Empty);
    }

    #[test]
    fn test_cell_compare() {
        assert_eq!(
            CellValue::Number(2.0).compare(&CellValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::text("alpha").compare(&CellValue::text("Beta")),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Empty.compare(&CellValue::text("a")),
            Ordering::Greater
        );

        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = d1.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(CellValue::Date(d1).compare(&CellValue::DateTime(d2)), Ordering::Less);
    }
}
