//! # Dialog Components
//!
//! Modal dialogs of the Atelier UI.
//!
//! - **ConfirmDeleteDialog**: confirmation before deleting a record

// ============================================================================
// Module Declarations
// ============================================================================

pub mod confirm_delete;

// ============================================================================
// Re-exports
// ============================================================================

pub use confirm_delete::{ConfirmDeleteDialog, delete_message};
