//! # Atelier CLI
//!
//! Headless client for the Atelier REST API, built on the same resource
//! catalogue, CRUD service and table engine as the desktop app.
//!
//! ## Commands
//!
//! - `resources` - List the available resources
//! - `list` - Show a resource's records with filter, sort, paging and hidden columns
//! - `get` - Show one record
//! - `create` - Create a record from `field=value` assignments
//! - `update` - Change fields of an existing record
//! - `delete` - Delete a record
//! - `config` - Print the effective configuration

pub mod commands;
pub mod output;

use atelier_core::AppConfig;
use clap::{Parser, Subcommand};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = "atelier-cli";

// ============================================================================
// Arguments
// ============================================================================

/// Command-line client for Atelier
#[derive(Parser, Debug)]
#[command(name = NAME, version, about = "Manage Atelier manufacturing records from the terminal")]
pub struct Cli {
    /// API base URL, overriding configuration
    #[arg(long = "api-url", global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available resources
    Resources,

    /// List records of a resource
    List {
        /// Resource name, e.g. machines
        resource: String,

        /// Only rows containing this text in a visible column
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort column, with an optional direction: `column` or `column:desc`
        #[arg(short, long, value_name = "COLUMN[:asc|desc]")]
        sort: Option<String>,

        /// One-based page number
        #[arg(short, long)]
        page: Option<usize>,

        /// Rows per page
        #[arg(long = "page-size")]
        page_size: Option<usize>,

        /// Hide a column (repeatable)
        #[arg(long, value_name = "COLUMN")]
        hide: Vec<String>,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record
    Get {
        resource: String,
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// Create a record
    Create {
        resource: String,

        /// Field assignment `field=value` (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },

    /// Update fields of a record
    Update {
        resource: String,
        key: String,

        /// Field assignment `field=value` (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,
    },

    /// Delete a record
    Delete {
        resource: String,
        key: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

// ============================================================================
// Entry Points
// ============================================================================

/// Resolve configuration for a parsed command line
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load()?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

/// Log filter for the given verbosity
pub fn log_filter(config: &AppConfig, verbose: u8) -> String {
    match verbose {
        0 => config.log_filter.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Run a parsed command, writing results to stdout
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    commands::execute(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_arguments() {
        let cli = Cli::parse_from([
            "atelier-cli", "list", "machines", "--filter", "presse", "--sort", "designation:desc",
            "--page", "2", "--hide", "atelier", "--hide", "type_machine",
        ]);
        match cli.command {
            Command::List {
                resource,
                filter,
                sort,
                page,
                hide,
                json,
                ..
            } => {
                assert_eq!(resource, "machines");
                assert_eq!(filter.as_deref(), Some("presse"));
                assert_eq!(sort.as_deref(), Some("designation:desc"));
                assert_eq!(page, Some(2));
                assert_eq!(hide, vec!["atelier".to_string(), "type_machine".to_string()]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_create_requires_assignments() {
        assert!(Cli::try_parse_from(["atelier-cli", "create", "causses"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["atelier-cli", "resources", "-vv", "--api-url", "http://x/api"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.api_url.as_deref(), Some("http://x/api"));
    }

    #[test]
    fn test_log_filter_follows_verbosity() {
        let config = AppConfig::default();
        assert_eq!(log_filter(&config, 0), "info");
        assert_eq!(log_filter(&config, 1), "debug");
        assert_eq!(log_filter(&config, 3), "trace");
    }
}
