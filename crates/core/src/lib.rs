//! # Atelier Core
//!
//! Core types, configuration, and error handling for Atelier.
//!
//! This crate provides the foundational building blocks used throughout
//! the Atelier workspace, including:
//!
//! - **Types**: Field validation rules and table cell values
//! - **Config**: Layered application configuration (`AppConfig`)
//! - **Errors**: Unified error handling with `AppError` and `AppResult`
//!

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, PAGE_SIZES};
pub use error::{AppError, AppResult, ResultExt};
pub use types::{CellValue, Validation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
