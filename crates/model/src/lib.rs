//! # Atelier Model
//!
//! Resource catalogue and client-side behaviour shared by every Atelier
//! front-end.
//!
//! ## Core Concepts
//!
//! - **ResourceKind**: one REST resource (machines, work orders, ...) with its
//!   endpoint, natural key and field descriptors
//! - **Resource**: a typed entity struct, the declared schema of an endpoint
//! - **Record**: a type-erased row used by tables, forms and option lists
//! - **FormValues**: raw form text, validated and turned into a payload
//! - **Table engine**: sorting, filtering, column visibility and pagination
//! - **AutocompleteState**: the combo-box state machine for reference fields
//!

pub mod autocomplete;
pub mod entities;
pub mod field;
pub mod form;
pub mod record;
pub mod resource;
pub mod role;
pub mod table;
pub mod wire;

pub use autocomplete::{
    AutocompleteError, AutocompleteState, Candidate, DEBOUNCE, DebounceTicket, NavKey,
    ValueChange, candidates_from_map,
};
pub use entities::decode_record;
pub use field::{FieldDef, FieldKind};
pub use form::{FormErrors, FormMode, FormValues, ReferenceOptions, SubmitError, SubmitResult};
pub use record::Record;
pub use resource::{Resource, ResourceKind};
pub use role::OperatorRole;
pub use table::{
    ColumnDescriptor, ColumnFilter, ControlledState, DataTable, PageAction, SortDirection,
    SortState, TableEvent, TableState, TableView, compute, cycle_sort, page_count, record_columns,
};

// Re-export core types that are commonly used with the model
pub use atelier_core::{AppError, AppResult, CellValue, Validation};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient imports for front-end crates
pub mod prelude {
    pub use crate::autocomplete::{AutocompleteState, Candidate, NavKey, ValueChange};
    pub use crate::form::{FormErrors, FormMode, FormValues};
    pub use crate::record::Record;
    pub use crate::resource::ResourceKind;
    pub use crate::table::{PageAction, SortState, TableEvent, TableState};
}
