//! # Atelier UI
//!
//! Dioxus Desktop UI for Atelier.
//!
//! One generic list page per resource (data table, create/edit side sheet,
//! delete confirmation) plus a home page, all driven by the shared
//! [`CrudService`].

// ============================================================================
// Modules
// ============================================================================

pub mod app;
pub mod components;
pub mod hooks;
pub mod pages;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use app::App;
pub use state::{APP_STATE, Page, Sheet, SheetMode, Toast, ToastLevel, UiState};

use atelier_api::{ClientResult, CrudService};
use atelier_core::AppConfig;
use std::sync::Arc;

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Atelier";

/// Application display title
pub const TITLE: &str = "Atelier - Manufacturing Operations";

/// CSS styles for the application
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Services
// ============================================================================

/// Shared services handed to the component tree as context
#[derive(Clone)]
pub struct Services {
    pub crud: Arc<CrudService>,
    pub config: Arc<AppConfig>,
}

impl Services {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        Ok(Self {
            crud: Arc::new(CrudService::from_config(&config)?),
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Launch Function
// ============================================================================

/// Launch the Atelier desktop application
pub fn launch(config: AppConfig) -> ClientResult<()> {
    tracing::info!(api = config.base_url(), "Starting {} v{}", NAME, VERSION);

    let services = Services::new(config)?;
    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(TITLE)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1400.0, 900.0))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(800.0, 600.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        .with_context(services)
        .launch(App);

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
