//! Typed entity schemas
//!
//! One struct per resource, mirroring the JSON the API returns. Decoding a
//! response through these structs is what validates it at the boundary.

use crate::record::Record;
use crate::resource::{Resource, ResourceKind};
use crate::role::OperatorRole;
use crate::wire;
use atelier_core::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! resource {
    ($ty:ty, $kind:expr, $key:ident) => {
        impl Resource for $ty {
            const KIND: ResourceKind = $kind;

            fn key(&self) -> &str {
                &self.$key
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub code_client: String,
    pub raison_sociale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
resource!(Client, ResourceKind::Client, code_client);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub fonction: OperatorRole,
}
resource!(Operator, ResourceKind::Operator, matricule);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(rename = "codeMachine")]
    pub code_machine: String,
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_machine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atelier: Option<String>,
    #[serde(
        default,
        with = "wire::option_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_mise_en_service: Option<NaiveDate>,
}
resource!(Machine, ResourceKind::Machine, code_machine);

/// Work order ("ordre de fabrication")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    #[serde(rename = "codeOf")]
    pub code_of: String,
    pub code_client: String,
    pub article: String,
    pub quantite: i64,
    #[serde(with = "wire::datetime")]
    pub date_lancement: NaiveDateTime,
    #[serde(
        default,
        with = "wire::option_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_echeance: Option<NaiveDate>,
    pub statut: WorkOrderStatus,
}
resource!(WorkOrder, ResourceKind::WorkOrder, code_of);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Planifie,
    EnCours,
    Termine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    pub code_production: String,
    #[serde(rename = "codeOf")]
    pub code_of: String,
    #[serde(rename = "codeMachine")]
    pub code_machine: String,
    pub matricule: String,
    #[serde(with = "wire::datetime")]
    pub date_debut: NaiveDateTime,
    #[serde(
        default,
        with = "wire::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_fin: Option<NaiveDateTime>,
    pub quantite_produite: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantite_rebut: Option<i64>,
}
resource!(Production, ResourceKind::Production, code_production);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    pub code_reparation: String,
    #[serde(rename = "codeMachine")]
    pub code_machine: String,
    pub matricule: String,
    #[serde(with = "wire::datetime")]
    pub date_reparation: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duree_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
resource!(Repair, ResourceKind::Repair, code_reparation);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    pub code_defaut: String,
    pub libelle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravite: Option<i64>,
}
resource!(Defect, ResourceKind::Defect, code_defaut);

/// Defect cause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    pub code_causse: String,
    pub libelle: String,
}
resource!(Cause, ResourceKind::Cause, code_causse);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub code_matiere: String,
    pub designation: String,
    pub unite: String,
    #[serde(
        default,
        deserialize_with = "wire::decimal::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_min: Option<f64>,
}
resource!(Material, ResourceKind::Material, code_matiere);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    pub code_consommation: String,
    #[serde(rename = "codeOf")]
    pub code_of: String,
    pub code_matiere: String,
    #[serde(deserialize_with = "wire::decimal::deserialize")]
    pub quantite: f64,
    #[serde(with = "wire::datetime")]
    pub date_consommation: NaiveDateTime,
}
resource!(Consumption, ResourceKind::Consumption, code_consommation);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub code_controle: String,
    #[serde(rename = "codeOf")]
    pub code_of: String,
    pub code_defaut: String,
    pub code_causse: String,
    pub matricule: String,
    pub quantite: i64,
    #[serde(with = "wire::datetime")]
    pub date_controle: NaiveDateTime,
}
resource!(QualityCheck, ResourceKind::QualityCheck, code_controle);

// ============================================================================
// Kind Dispatch
// ============================================================================

fn through<R: Resource>(value: Value) -> AppResult<Record> {
    let typed: R = serde_json::from_value(value)
        .map_err(|e| AppError::invalid_record(R::KIND.slug(), e.to_string()))?;
    typed.to_record()
}

/// Decode a JSON value through the kind's typed schema and erase it
///
/// Unknown extra keys are dropped and wire formats are normalised.
pub fn decode_record(kind: ResourceKind, value: Value) -> AppResult<Record> {
    match kind {
        ResourceKind::Client => through::<Client>(value),
        ResourceKind::Operator => through::<Operator>(value),
        ResourceKind::Machine => through::<Machine>(value),
        ResourceKind::WorkOrder => through::<WorkOrder>(value),
        ResourceKind::Production => through::<Production>(value),
        ResourceKind::Repair => through::<Repair>(value),
        ResourceKind::Defect => through::<Defect>(value),
        ResourceKind::Cause => through::<Cause>(value),
        ResourceKind::Material => through::<Material>(value),
        ResourceKind::Consumption => through::<Consumption>(value),
        ResourceKind::QualityCheck => through::<QualityCheck>(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_normalises_wire_formats() {
        let record = decode_record(
            ResourceKind::Consumption,
            json!({
                "code_consommation": "C1",
                "codeOf": "OF1",
                "code_matiere": "MAT1",
                "quantite": "3.25",
                "date_consommation": "2024-02-01T10:00:00.000000Z",
                "created_at": "2024-02-01T10:00:00.000000Z"
            }),
        )
        .unwrap();

        assert_eq!(record.key(), "C1");
        assert_eq!(record.get("quantite"), Some(&json!(3.25)));
        assert_eq!(record.text("date_consommation"), "2024-02-01 10:00:00");
        assert_eq!(record.get("created_at"), None);
    }

    #[test]
    fn test_decode_rejects_schema_mismatch() {
        let err = decode_record(
            ResourceKind::WorkOrder,
            json!({"codeOf": "OF1", "code_client": "C1", "article": "Axe"}),
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Invalid 'ofs' record: missing field"));
    }

    #[test]
    fn test_unknown_role_survives_decoding() {
        let record = decode_record(
            ResourceKind::Operator,
            json!({"matricule": "OP7", "nom": "Petit", "prenom": "Léa", "fonction": "Régleuse"}),
        )
        .unwrap();
        assert_eq!(record.role(), Some(OperatorRole::Other("Régleuse".to_string())));
    }

    #[test]
    fn test_typed_key_and_record() {
        let cause = Cause {
            code_causse: "CA1".to_string(),
            libelle: "Usure outil".to_string(),
        };
        assert_eq!(cause.key(), "CA1");

        let record = cause.to_record().unwrap();
        assert_eq!(record.option_label(), "CA1 - Usure outil");
        assert_eq!(Cause::from_record(&record).unwrap(), cause);
        assert!(Defect::from_record(&record).is_err());
    }
}
