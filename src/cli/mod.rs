//! CLI module
//!
//! Command-line interface for producing the report.
//!
//! # Commands
//!
//! - `run` - Poll the status API and write the report to Google Sheets
//! - `print` - Poll the status API and print the report
//! - `flatten` - Build the report offline from a saved payload

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_clusters, Runner};
