//! Sink trait

use crate::error::Result;
use crate::table::Table;
use async_trait::async_trait;

/// A destination that holds exactly one report table at a time
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Replace the destination contents with `table` (header row first)
    async fn replace(&self, table: &Table) -> Result<()>;

    /// Short human-readable description used in logs
    fn describe(&self) -> String;
}

/// How the console sink renders a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// Column-aligned text with a header underline
    #[default]
    Pretty,
    /// One JSON object per row
    Json,
}
