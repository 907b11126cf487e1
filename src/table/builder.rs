//! Dynamic table assembly
//!
//! Each cluster is flattened, tagged with its identifier, and the sorted
//! union of all column paths becomes the header.

use super::types::Table;
use crate::error::Result;
use crate::flatten::Flattener;
use crate::types::{ClusterMap, FlatRecord};
use std::collections::BTreeSet;

/// Reserved column holding the cluster identifier
pub const CLUSTER_NAME_COLUMN: &str = "cluster_name";

/// Flatten every cluster and inject its identifier under `cluster_name`
///
/// The identifier overwrites a flattened `cluster_name` path if the record
/// happens to produce one. Records come out in cluster identifier order.
pub fn flatten_clusters(clusters: &ClusterMap, flattener: &Flattener) -> Vec<FlatRecord> {
    clusters
        .iter()
        .map(|(id, value)| {
            let mut record = flattener.flatten(value);
            record.insert(CLUSTER_NAME_COLUMN.to_string(), id.clone());
            record
        })
        .collect()
}

/// Sorted, de-duplicated union of the keys of all records
pub fn build_header(records: &[FlatRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build a table with one row per record, `""` where a record lacks a column
pub fn build_table(records: &[FlatRecord]) -> Result<Table> {
    let header = build_header(records);
    let mut table = Table::new(header);

    for record in records {
        let row = table
            .header()
            .iter()
            .map(|column| record.get(column).cloned().unwrap_or_default())
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

/// Flatten a cluster map into the dynamic-column report table
pub fn dynamic_table(clusters: &ClusterMap, flattener: &Flattener) -> Result<Table> {
    let records = flatten_clusters(clusters, flattener);
    build_table(&records)
}
