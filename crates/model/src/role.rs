//! Operator roles
//!
//! The API stores an operator's `fonction` as free text. Known values are
//! recognised regardless of case or accents; anything else is kept verbatim
//! as [`OperatorRole::Other`] and reported when decoded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Operator job function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperatorRole {
    /// Welder, assigned to repairs
    Soudeur,
    /// Quality controller, assigned to quality checks
    Controleur,
    /// Machine operator, assigned to production runs
    Operateur,
    /// Unrecognised free-text value
    Other(String),
}

impl OperatorRole {
    /// Roles offered in forms
    pub const KNOWN: [OperatorRole; 3] = [
        OperatorRole::Soudeur,
        OperatorRole::Controleur,
        OperatorRole::Operateur,
    ];

    /// Parse a free-text role without side effects
    pub fn parse(raw: &str) -> Self {
        match fold(raw).as_str() {
            "soudeur" => OperatorRole::Soudeur,
            "controleur" => OperatorRole::Controleur,
            "operateur" => OperatorRole::Operateur,
            _ => OperatorRole::Other(raw.trim().to_string()),
        }
    }

    /// Parse a role coming from the API, flagging unknown values
    pub fn from_wire(raw: &str) -> Self {
        let role = Self::parse(raw);
        if let OperatorRole::Other(value) = &role {
            tracing::warn!(value = %value, "Unrecognised operator role");
        }
        role
    }

    /// Value sent to the API
    pub fn wire_value(&self) -> &str {
        match self {
            OperatorRole::Soudeur => "soudeur",
            OperatorRole::Controleur => "controleur",
            OperatorRole::Operateur => "operateur",
            OperatorRole::Other(value) => value,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            OperatorRole::Soudeur => "Soudeur",
            OperatorRole::Controleur => "Contrôleur",
            OperatorRole::Operateur => "Opérateur",
            OperatorRole::Other(value) => value,
        }
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for OperatorRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_value())
    }
}

impl<'de> Deserialize<'de> for OperatorRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OperatorRole::from_wire(&raw))
    }
}

/// Lowercase and strip the accents used in French role names, precomposed
/// or as combining marks
fn fold(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ignores_case_and_accents() {
        assert_eq!(OperatorRole::parse("Soudeur"), OperatorRole::Soudeur);
        assert_eq!(OperatorRole::parse("CONTRÔLEUR"), OperatorRole::Controleur);
        assert_eq!(OperatorRole::parse(" contrôleur "), OperatorRole::Controleur);
        assert_eq!(OperatorRole::parse("Opérateur"), OperatorRole::Operateur);
    }

    #[test]
    fn test_parse_handles_combining_accents() {
        assert_eq!(OperatorRole::parse("Contro\u{302}leur"), OperatorRole::Controleur);
        assert_eq!(OperatorRole::parse("Ope\u{301}rateur"), OperatorRole::Operateur);
    }

    #[test]
    fn test_unknown_role_is_preserved() {
        let role = OperatorRole::parse("Régleur ");
        assert_eq!(role, OperatorRole::Other("Régleur".to_string()));
        assert_eq!(role.wire_value(), "Régleur");
    }

    #[test]
    fn test_serde_uses_wire_value() {
        let role: OperatorRole = serde_json::from_str("\"Contrôleur\"").unwrap();
        assert_eq!(role, OperatorRole::Controleur);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"controleur\"");
        assert_eq!(role.to_string(), "Contrôleur");
    }
}
