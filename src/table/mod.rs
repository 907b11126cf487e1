//! Table assembly
//!
//! Turns the cluster map of a status payload into a rectangular [`Table`].
//!
//! # Modes
//!
//! - **Dynamic**: every flattened leaf becomes a column; the header is the
//!   sorted union of all column paths plus `cluster_name`
//! - **Summary**: a fixed 8-column health overview
//!
//! Rows are always ordered by cluster identifier, so the same payload
//! produces the same table byte for byte.

mod builder;
mod summary;
mod types;

pub use builder::{build_header, build_table, dynamic_table, flatten_clusters, CLUSTER_NAME_COLUMN};
pub use summary::{operator_health, summary_table, SummarySchema, SUMMARY_HEADER};
pub use types::Table;

use crate::error::Result;
use crate::flatten::Flattener;
use crate::types::{ClusterMap, ReportMode};

/// Build the report table in the requested shape
pub fn build_report(clusters: &ClusterMap, mode: ReportMode) -> Result<Table> {
    match mode {
        ReportMode::Dynamic => dynamic_table(clusters, &Flattener::default()),
        ReportMode::Summary => summary_table(clusters, &SummarySchema::default()),
    }
}
