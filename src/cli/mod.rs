//! CLI module for dsconfig
//!
//! Provides command-line interface for:
//! - serve: Run the persistence endpoint
//! - normalize: Canonicalize a settings document from stdin
//! - presets: Inspect query presets
//! - edit: Change and save a data source's settings

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{edit, normalize, presets, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
