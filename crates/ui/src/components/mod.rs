//! # UI Components
//!
//! Reusable Dioxus components for the Atelier resource screens.
//!
//! - **Data Table**: sortable, searchable, paged table of records
//! - **Resource Form**: create/edit form built from field descriptors
//! - **Autocomplete**: type-ahead select for reference fields
//! - **Inputs**: text, text area and select controls
//! - **Side Sheet**: right-hand panel hosting the form
//! - **Dialogs**: delete confirmation
//! - **Feedback**: load error alert, toasts, spinner
//!
//! ## Component Hierarchy
//!
//! ```text
//! ResourceListPage
//! ├── DataTable
//! └── LoadErrorAlert (on failed read)
//!
//! SideSheet
//! └── ResourceForm
//!     └── FormField (multiple)
//!         ├── TextInput / TextArea / Select
//!         └── Autocomplete
//!
//! ConfirmDeleteDialog
//! ToastStack
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod autocomplete;
pub mod data_table;
pub mod dialogs;
pub mod feedback;
pub mod inputs;
pub mod resource_form;
pub mod sheet;

// ============================================================================
// Re-exports
// ============================================================================

pub use autocomplete::Autocomplete;
pub use data_table::DataTable;
pub use dialogs::ConfirmDeleteDialog;
pub use feedback::{LoadErrorAlert, Spinner, ToastStack};
pub use inputs::{FieldFrame, Select, SelectOption, TextArea, TextInput};
pub use resource_form::{FormField, ResourceForm};
pub use sheet::SideSheet;
