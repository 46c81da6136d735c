use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "OBJMAN_LOG";
pub const HOME_ENV: &str = "OBJMAN_HOME";
pub const TENANT_ENV: &str = "OBJMAN_TENANT";

#[derive(Parser, Debug)]
#[command(name = "objman", bin_name = "objman", version)]
#[command(about = "Compose record page layouts and compile record-list filters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Tenant to act for (defaults to $OBJMAN_TENANT, then "default")
    #[arg(short, long, global = true)]
    pub tenant: Option<String>,

    /// Data directory (defaults to $OBJMAN_HOME, then the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and edit page layouts
    #[command(subcommand)]
    Layout(LayoutCommands),

    /// Validate, compile and edit record-list filters
    #[command(subcommand)]
    Filter(FilterCommands),

    /// Get or set configuration values
    Config {
        /// Configuration key (placeholder_style, case_insensitive_like, table_alias, default_width)
        key: Option<String>,
        /// Value to set
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommands {
    /// Show the sections and blocks of an object's layout
    Show { object: String },

    /// Report broken placement rules in the stored layout
    Check { object: String },

    /// List catalog items not yet placed on the layout
    Palette { object: String },

    /// Apply a JSON file of layout commands and save the result
    Apply {
        object: String,
        /// File holding a JSON array of commands
        commands: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// Check a record list's filters against the object's fields
    Validate { list: String },

    /// Print the SQL predicate and parameters for a record list
    Compile {
        list: String,
        /// Qualify columns with this table alias
        #[arg(long)]
        alias: Option<String>,
    },

    /// Describe a record list's filters in plain words
    Describe { list: String },

    /// Apply a JSON file of filter edits and save the result
    Edit {
        list: String,
        /// File holding a JSON array of edits
        edits: PathBuf,
    },
}

/// Logs go to stderr so `--json` output stays parseable.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "objman=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
