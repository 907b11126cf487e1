//! CLI commands and argument parsing

use crate::config::{
    ConfigOverrides, ADMIN_TOKEN, API_ROUTE, GOOGLE_APPLICATION_CREDENTIALS, POLL_INTERVAL_SECS,
    POLL_MAX_ATTEMPTS, REPORT_MODE, REQUEST_TIMEOUT_SECS, SHEET_RANGE, SPREADSHEET_ID,
};
use crate::sink::ConsoleFormat;
use crate::types::ReportMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cluster status report generator
///
/// Every option below can also be given through the environment variable
/// named in its help text; the command line wins.
#[derive(Parser, Debug)]
#[command(name = "cluster-report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Table shape: dynamic or summary [REPORT_MODE]
    #[arg(short, long, global = true)]
    pub mode: Option<ReportMode>,

    /// Status API base URL [API_ROUTE]
    #[arg(long, global = true)]
    pub api_route: Option<String>,

    /// Admin credential for the login endpoint [ADMIN_TOKEN]
    #[arg(long, global = true, hide = true)]
    pub admin_token: Option<String>,

    /// Destination spreadsheet [SPREADSHEET_ID]
    #[arg(long, global = true)]
    pub spreadsheet_id: Option<String>,

    /// Service-account key file [GOOGLE_APPLICATION_CREDENTIALS]
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Range cleared and rewritten [SHEET_RANGE]
    #[arg(long, global = true)]
    pub sheet_range: Option<String>,

    /// Maximum status polls [POLL_MAX_ATTEMPTS]
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Seconds to wait before each poll [POLL_INTERVAL_SECS]
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    /// Per-request timeout in seconds [REQUEST_TIMEOUT_SECS]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flag values that take precedence over the environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides::new()
            .set(REPORT_MODE, self.mode)
            .set(API_ROUTE, self.api_route.as_ref())
            .set(ADMIN_TOKEN, self.admin_token.as_ref())
            .set(SPREADSHEET_ID, self.spreadsheet_id.as_ref())
            .set(
                GOOGLE_APPLICATION_CREDENTIALS,
                self.credentials.as_ref().map(|p| p.display().to_string()),
            )
            .set(SHEET_RANGE, self.sheet_range.as_ref())
            .set(POLL_MAX_ATTEMPTS, self.max_attempts)
            .set(POLL_INTERVAL_SECS, self.interval)
            .set(REQUEST_TIMEOUT_SECS, self.timeout)
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the status API and write the report to Google Sheets
    Run,

    /// Poll the status API and print the report instead of writing it
    Print {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Build the report from a saved status payload or cluster map
    Flatten {
        /// JSON file to read
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    Pretty,
    /// JSON output (one row per line)
    Json,
}

impl From<OutputFormat> for ConsoleFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => ConsoleFormat::Pretty,
            OutputFormat::Json => ConsoleFormat::Json,
        }
    }
}
