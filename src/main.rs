//! Atelier
//!
//! Manufacturing operations desktop front-end.
//!
//! This is the main entry point for the Dioxus Desktop application.

use anyhow::Context;
use atelier_core::AppConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Loading configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .pretty()
        .init();

    // Print startup banner
    println!();
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║                                                           ║");
    println!("║   🏭 Atelier v{:<44}║", env!("CARGO_PKG_VERSION"));
    println!("║   Manufacturing operations                                ║");
    println!("║                                                           ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    // Launch the Dioxus desktop application
    atelier_ui::launch(config)?;
    Ok(())
}
