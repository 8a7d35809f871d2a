//! CLI argument definitions using clap
//!
//! Commands:
//! - dsconfig serve --config <path>
//! - dsconfig normalize [--schema <name>] [--fill-templates]
//! - dsconfig presets [name]
//! - dsconfig edit <id> --set queries.usersQuery=... [--preset segment]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;

/// dsconfig - data source query settings
#[derive(Parser, Debug)]
#[command(name = "dsconfig")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log line format on stderr (text or json). Overrides the config file.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the data source and presentation endpoints
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./dsconfig.json")]
        config: PathBuf,
    },

    /// Read stored settings JSON from stdin and print the canonical form
    Normalize {
        /// Schema used to qualify generated table names
        #[arg(long)]
        schema: Option<String>,

        /// Fill missing queries from the template library
        #[arg(long)]
        fill_templates: bool,

        /// Keep unrecognized event keys
        #[arg(long)]
        preserve_unknown_events: bool,
    },

    /// List query presets, or print one
    Presets {
        name: Option<String>,
    },

    /// Edit a stored data source's settings and save them
    Edit {
        /// Path to configuration file
        #[arg(long, default_value = "./dsconfig.json")]
        config: PathBuf,

        /// Data source id
        id: String,

        /// Field assignment, e.g. `queries.usersQuery=SELECT ...` or
        /// `variationIdFormat=key`. Repeatable.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Preset applied before any `--set`
        #[arg(long)]
        preset: Option<String>,

        /// Tag recorded with telemetry events
        #[arg(long, default_value = "cli")]
        source: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
