//! Console sink

use super::types::{ConsoleFormat, TableSink};
use crate::error::{Error, Result};
use crate::table::Table;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints the table to a writer (stdout by default)
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    writer: Mutex<W>,
    format: ConsoleFormat,
}

impl ConsoleSink {
    /// Sink printing to stdout
    pub fn stdout(format: ConsoleFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Sink printing to `writer`
    pub fn new(writer: W, format: ConsoleFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    /// Output format
    pub fn format(&self) -> ConsoleFormat {
        self.format
    }

    /// Give back the writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|_| Error::sink("console writer lock poisoned"))
    }

    fn render(&self, table: &Table) -> Result<String> {
        match self.format {
            ConsoleFormat::Pretty => Ok(render_pretty(table)),
            ConsoleFormat::Json => render_json(table),
        }
    }
}

#[async_trait]
impl<W: Write + Send> TableSink for ConsoleSink<W> {
    async fn replace(&self, table: &Table) -> Result<()> {
        let text = self.render(table)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::sink("console writer lock poisoned"))?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        "console".to_string()
    }
}

/// Columns padded to their widest cell, header underlined with dashes
pub(crate) fn render_pretty(table: &Table) -> String {
    let mut widths: Vec<usize> = table.header().iter().map(|h| h.chars().count()).collect();
    for row in table.rows() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = format_line(table.header());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_line(&rule));
    for row in table.rows() {
        out.push_str(&format_line(row));
    }
    out
}

/// One JSON object per row, keyed by column name
pub(crate) fn render_json(table: &Table) -> Result<String> {
    let mut out = String::new();
    for row in table.rows() {
        let object: Map<String, Value> = table
            .header()
            .iter()
            .zip(row)
            .map(|(column, cell)| (column.clone(), Value::String(cell.clone())))
            .collect();
        let line = serde_json::to_string(&Value::Object(object))
            .map_err(|e| Error::sink(format!("failed to encode row: {e}")))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
