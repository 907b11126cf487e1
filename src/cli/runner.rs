//! CLI runner - executes commands

use crate::auth::ServiceAccountKey;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ReportConfig, REPORT_MODE};
use crate::decode::decode_json;
use crate::error::{Error, Result, ResultExt};
use crate::pipeline::ReportPipeline;
use crate::sink::{ConsoleSink, SheetsSink, SheetsSinkConfig, TableSink};
use crate::status::StatusPayload;
use crate::table::build_report;
use crate::types::{ClusterMap, OptionStringExt, ReportMode};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run => self.run_report().await,
            Commands::Print { format } => self.print(*format).await,
            Commands::Flatten { file, format } => self.flatten(file, *format).await,
        }
    }

    fn load_config(&self) -> Result<ReportConfig> {
        ReportConfig::from_env_with(&self.cli.overrides())
    }

    /// Full pipeline into Google Sheets
    async fn run_report(&self) -> Result<()> {
        let config = self.load_config()?;
        let target = config.sheet_target()?;

        // Key file errors surface before any polling
        let key = ServiceAccountKey::from_file(&target.credentials_file)?;
        let sink_config = SheetsSinkConfig::new(target.spreadsheet_id, target.range)
            .with_timeout(config.request_timeout);
        let sink = SheetsSink::new(sink_config, &key)?;

        let mut pipeline = ReportPipeline::new(config);
        pipeline.run(&sink).await?;
        info!("Successfully updated Google Sheet");
        Ok(())
    }

    /// Full pipeline, table printed to stdout
    async fn print(&self, format: OutputFormat) -> Result<()> {
        let config = self.load_config()?;
        let sink = ConsoleSink::stdout(format.into());

        let mut pipeline = ReportPipeline::new(config);
        pipeline.run(&sink).await?;
        Ok(())
    }

    /// Offline: build the table from a file
    async fn flatten(&self, file: &Path, format: OutputFormat) -> Result<()> {
        let text = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let clusters = parse_clusters(&text)?;

        let table = build_report(&clusters, self.mode()?)?;
        ConsoleSink::stdout(format.into()).replace(&table).await
    }

    /// `--mode`, else `REPORT_MODE`, else the default
    fn mode(&self) -> Result<ReportMode> {
        if let Some(mode) = self.cli.mode {
            return Ok(mode);
        }
        match std::env::var(REPORT_MODE).ok().none_if_empty() {
            Some(raw) => ReportMode::from_str(&raw)
                .map_err(|message| Error::invalid_value(REPORT_MODE, message)),
            None => Ok(ReportMode::default()),
        }
    }
}

/// Read clusters from a saved status payload or a bare cluster map
///
/// A JSON object with a `status` or `body` key is taken as a full status
/// payload; any other object is taken as the cluster map itself.
pub fn parse_clusters(text: &str) -> Result<ClusterMap> {
    let value: Value = decode_json(text, "input file")?;
    let is_payload = value
        .as_object()
        .is_some_and(|map| map.contains_key("status") || map.contains_key("body"));

    if is_payload {
        let payload: StatusPayload = serde_json::from_value(value)
            .map_err(|e| Error::decode("status payload", e.to_string()))?;
        return Ok(payload.into_clusters());
    }

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(Error::decode(
            "input file",
            format!("expected a JSON object, found {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
