//! Resource catalogue
//!
//! Every REST resource the application manages is a [`ResourceKind`]. A kind
//! knows its endpoint, its natural key, how to label its records in option
//! lists, and the [`FieldDef`]s its forms and tables are built from.

use crate::field::{FieldDef, FieldKind};
use crate::record::Record;
use crate::role::OperatorRole;
use atelier_core::{AppError, AppResult, Validation};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use std::str::FromStr;

/// Work order statuses
pub const WORK_ORDER_STATUSES: &[&str] = &["planifie", "en_cours", "termine"];

/// Material units
pub const MATERIAL_UNITS: &[&str] = &["kg", "m", "l", "piece"];

// ============================================================================
// Resource Kind
// ============================================================================

/// A REST resource managed by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Client,
    Operator,
    Machine,
    WorkOrder,
    Production,
    Repair,
    Defect,
    Cause,
    Material,
    Consumption,
    QualityCheck,
}

impl ResourceKind {
    /// All resources, in navigation order
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Client,
        ResourceKind::Operator,
        ResourceKind::Machine,
        ResourceKind::WorkOrder,
        ResourceKind::Production,
        ResourceKind::Repair,
        ResourceKind::Defect,
        ResourceKind::Cause,
        ResourceKind::Material,
        ResourceKind::Consumption,
        ResourceKind::QualityCheck,
    ];

    /// Path segment under the API base URL, also used as the CLI name
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Client => "clients",
            ResourceKind::Operator => "operateurs",
            ResourceKind::Machine => "machines",
            ResourceKind::WorkOrder => "ofs",
            ResourceKind::Production => "productions",
            ResourceKind::Repair => "reparations",
            ResourceKind::Defect => "defauts",
            ResourceKind::Cause => "causses",
            ResourceKind::Material => "matieres",
            ResourceKind::Consumption => "consommations",
            ResourceKind::QualityCheck => "controles",
        }
    }

    /// Wire name of the natural key
    pub fn key_field(self) -> &'static str {
        match self {
            ResourceKind::Client => "code_client",
            ResourceKind::Operator => "matricule",
            ResourceKind::Machine => "codeMachine",
            ResourceKind::WorkOrder => "codeOf",
            ResourceKind::Production => "code_production",
            ResourceKind::Repair => "code_reparation",
            ResourceKind::Defect => "code_defaut",
            ResourceKind::Cause => "code_causse",
            ResourceKind::Material => "code_matiere",
            ResourceKind::Consumption => "code_consommation",
            ResourceKind::QualityCheck => "code_controle",
        }
    }

    /// Wire name of the field shown next to the key in option labels
    pub fn label_field(self) -> &'static str {
        match self {
            ResourceKind::Client => "raison_sociale",
            ResourceKind::Operator => "nom",
            ResourceKind::Machine | ResourceKind::Material => "designation",
            ResourceKind::WorkOrder => "article",
            ResourceKind::Defect | ResourceKind::Cause => "libelle",
            ResourceKind::Production => "codeOf",
            ResourceKind::Repair => "codeMachine",
            ResourceKind::Consumption => "code_matiere",
            ResourceKind::QualityCheck => "code_defaut",
        }
    }

    /// Singular display name
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Client => "Client",
            ResourceKind::Operator => "Opérateur",
            ResourceKind::Machine => "Machine",
            ResourceKind::WorkOrder => "OF",
            ResourceKind::Production => "Production",
            ResourceKind::Repair => "Réparation",
            ResourceKind::Defect => "Défaut",
            ResourceKind::Cause => "Causse",
            ResourceKind::Material => "Matière",
            ResourceKind::Consumption => "Consommation",
            ResourceKind::QualityCheck => "Contrôle qualité",
        }
    }

    /// Plural display name
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Client => "Clients",
            ResourceKind::Operator => "Opérateurs",
            ResourceKind::Machine => "Machines",
            ResourceKind::WorkOrder => "OFs",
            ResourceKind::Production => "Productions",
            ResourceKind::Repair => "Réparations",
            ResourceKind::Defect => "Défauts",
            ResourceKind::Cause => "Causses",
            ResourceKind::Material => "Matières",
            ResourceKind::Consumption => "Consommations",
            ResourceKind::QualityCheck => "Contrôles qualité",
        }
    }

    /// Field descriptors, key first
    pub fn fields(self) -> Vec<FieldDef> {
        use FieldKind::*;

        let key_label = match self {
            ResourceKind::Operator => "Matricule",
            _ => "Code",
        };
        let mut fields = vec![FieldDef::key(self.key_field()).with_label(key_label)];

        match self {
            ResourceKind::Client => fields.extend([
                FieldDef::new("raison_sociale", Text)
                    .required()
                    .with_label("Raison sociale"),
                FieldDef::new("adresse", Text).with_label("Adresse"),
                FieldDef::new("telephone", Text)
                    .with_label("Téléphone")
                    .with_validation(Validation::Phone),
                FieldDef::new("email", Text)
                    .with_label("Email")
                    .with_validation(Validation::Email)
                    .with_placeholder("contact@example.com"),
            ]),
            ResourceKind::Operator => {
                fields.extend([
                    FieldDef::new("nom", Text)
                        .required()
                        .with_label("Nom")
                        .with_validation(Validation::MinLength(2)),
                    FieldDef::new("prenom", Text).required().with_label("Prénom"),
                    FieldDef::new("fonction", Role).required().with_label("Fonction"),
                ])
            }
            ResourceKind::Machine => fields.extend([
                FieldDef::new("designation", Text)
                    .required()
                    .with_label("Désignation"),
                FieldDef::new("type_machine", Text).with_label("Type"),
                FieldDef::new("atelier", Text).with_label("Atelier"),
                FieldDef::new("date_mise_en_service", Date).with_label("Mise en service"),
            ]),
            ResourceKind::WorkOrder => fields.extend([
                FieldDef::reference("code_client", ResourceKind::Client).with_label("Client"),
                FieldDef::new("article", Text).required().with_label("Article"),
                FieldDef::new("quantite", Integer)
                    .required()
                    .with_label("Quantité")
                    .with_validation(Validation::Min(1.0)),
                FieldDef::new("date_lancement", DateTime)
                    .required()
                    .with_label("Lancement"),
                FieldDef::new("date_echeance", Date).with_label("Échéance"),
                FieldDef::new("statut", Choice(WORK_ORDER_STATUSES))
                    .required()
                    .with_label("Statut"),
            ]),
            ResourceKind::Production => fields.extend([
                FieldDef::reference("codeOf", ResourceKind::WorkOrder).with_label("OF"),
                FieldDef::reference("codeMachine", ResourceKind::Machine).with_label("Machine"),
                FieldDef::operator("matricule", OperatorRole::Operateur).with_label("Opérateur"),
                FieldDef::new("date_debut", DateTime).required().with_label("Début"),
                FieldDef::new("date_fin", DateTime).with_label("Fin"),
                FieldDef::new("quantite_produite", Integer)
                    .required()
                    .with_label("Quantité produite")
                    .with_validation(Validation::Min(0.0)),
                FieldDef::new("quantite_rebut", Integer)
                    .with_label("Rebut")
                    .with_validation(Validation::Min(0.0)),
            ]),
            ResourceKind::Repair => fields.extend([
                FieldDef::reference("codeMachine", ResourceKind::Machine).with_label("Machine"),
                FieldDef::operator("matricule", OperatorRole::Soudeur).with_label("Soudeur"),
                FieldDef::new("date_reparation", DateTime)
                    .required()
                    .with_label("Date"),
                FieldDef::new("duree_minutes", Integer)
                    .with_label("Durée (min)")
                    .with_validation(Validation::Min(0.0)),
                FieldDef::new("description", LongText).with_label("Description"),
            ]),
            ResourceKind::Defect => fields.extend([
                FieldDef::new("libelle", Text).required().with_label("Libellé"),
                FieldDef::new("gravite", Integer)
                    .with_label("Gravité")
                    .with_validation(Validation::Min(1.0))
                    .with_validation(Validation::Max(5.0)),
            ]),
            ResourceKind::Cause => fields.extend([FieldDef::new("libelle", Text)
                .required()
                .with_label("Libellé")]),
            ResourceKind::Material => fields.extend([
                FieldDef::new("designation", Text)
                    .required()
                    .with_label("Désignation"),
                FieldDef::new("unite", Choice(MATERIAL_UNITS))
                    .required()
                    .with_label("Unité"),
                FieldDef::new("stock_min", Decimal)
                    .with_label("Stock minimum")
                    .with_validation(Validation::Min(0.0)),
            ]),
            ResourceKind::Consumption => fields.extend([
                FieldDef::reference("codeOf", ResourceKind::WorkOrder).with_label("OF"),
                FieldDef::reference("code_matiere", ResourceKind::Material)
                    .with_label("Matière"),
                FieldDef::new("quantite", Decimal)
                    .required()
                    .with_label("Quantité")
                    .with_validation(Validation::Positive),
                FieldDef::new("date_consommation", DateTime)
                    .required()
                    .with_label("Date"),
            ]),
            ResourceKind::QualityCheck => fields.extend([
                FieldDef::reference("codeOf", ResourceKind::WorkOrder).with_label("OF"),
                FieldDef::reference("code_defaut", ResourceKind::Defect).with_label("Défaut"),
                FieldDef::reference("code_causse", ResourceKind::Cause).with_label("Causse"),
                FieldDef::operator("matricule", OperatorRole::Controleur)
                    .with_label("Contrôleur"),
                FieldDef::new("quantite", Integer)
                    .required()
                    .with_label("Quantité")
                    .with_validation(Validation::Min(1.0)),
                FieldDef::new("date_controle", DateTime)
                    .required()
                    .with_label("Date"),
            ]),
        }

        fields
    }

    /// Look up a field descriptor by wire name
    pub fn field(self, name: &str) -> AppResult<FieldDef> {
        self.fields()
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AppError::FieldNotFound {
                resource: self.slug().to_string(),
                field: name.to_string(),
            })
    }

    /// Resources referenced by this resource's fields
    pub fn dependencies(self) -> Vec<ResourceKind> {
        let mut deps: Vec<ResourceKind> = self
            .fields()
            .iter()
            .filter_map(|f| f.kind.reference_target())
            .collect();
        deps.dedup();
        deps
    }

    /// Option label shown in autocomplete lists
    pub fn option_label(key: &str, label: &str) -> String {
        format!("{} - {}", key, label)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.slug() == wanted || format!("{:?}", k).to_lowercase() == wanted)
            .ok_or_else(|| AppError::UnknownResource(s.to_string()))
    }
}

// ============================================================================
// Resource Trait
// ============================================================================

/// A typed record: the declared response schema of one endpoint
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Catalogue entry for this type
    const KIND: ResourceKind;

    /// Natural key value
    fn key(&self) -> &str;

    /// Erase into a generic record
    fn to_record(&self) -> AppResult<Record> {
        let value = serde_json::to_value(self)
            .map_err(|e| AppError::invalid_record(Self::KIND.slug(), e.to_string()))?;
        Record::from_value(Self::KIND, value)
    }

    /// Decode a generic record back into the typed schema
    fn from_record(record: &Record) -> AppResult<Self> {
        if record.kind() != Self::KIND {
            return Err(AppError::internal(format!(
                "Expected a '{}' record, got '{}'",
                Self::KIND,
                record.kind()
            )));
        }
        serde_json::from_value(record.to_value())
            .map_err(|e| AppError::invalid_record(Self::KIND.slug(), e.to_string()))
    }
}
