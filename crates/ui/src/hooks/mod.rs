//! # UI Hooks
//!
//! Custom Dioxus hooks for the Atelier UI.

// ============================================================================
// Module Declarations
// ============================================================================

pub mod use_query;

// ============================================================================
// Re-exports
// ============================================================================

pub use use_query::{LoadState, Query, use_field_options, use_list};
