//! Fixed-schema summary table
//!
//! Eight columns per cluster instead of one per leaf: identity, version,
//! cloud, API URL, node counts, the ingress operator and an aggregate of
//! all operators.

use super::types::Table;
use crate::error::Result;
use crate::flatten::format_number;
use crate::types::ClusterMap;
use serde_json::Value;

/// Column names of the summary table, in order
pub const SUMMARY_HEADER: [&str; 8] = [
    "Cluster Name",
    "Version",
    "Cloud",
    "API URL",
    "Ready Nodes",
    "Total Nodes",
    "Ingress Operator",
    "Operators",
];

/// Where each summary column is read from in a cluster record
///
/// Paths are dot separated (`node_summary.ready`).
#[derive(Debug, Clone)]
pub struct SummarySchema {
    pub version_path: String,
    pub cloud_path: String,
    pub api_url_path: String,
    pub ready_nodes_path: String,
    pub total_nodes_path: String,
    pub ingress_status_path: String,
    /// Map of operator name -> `{ "status": ... }`
    pub operators_path: String,
    /// Operator status counted as healthy
    pub healthy_value: String,
}

impl Default for SummarySchema {
    fn default() -> Self {
        Self {
            version_path: "ocp_version".to_string(),
            cloud_path: "cloud".to_string(),
            api_url_path: "api_url".to_string(),
            ready_nodes_path: "node_summary.ready".to_string(),
            total_nodes_path: "node_summary.total".to_string(),
            ingress_status_path: "operators.ingress.status".to_string(),
            operators_path: "operators".to_string(),
            healthy_value: "Healthy".to_string(),
        }
    }
}

impl SummarySchema {
    /// One summary row for a cluster
    pub fn row(&self, cluster_name: &str, record: &Value) -> Vec<String> {
        let operators = lookup(record, &self.operators_path)
            .map(|ops| operator_health(ops, &self.healthy_value))
            .unwrap_or_default();

        vec![
            cluster_name.to_string(),
            lookup_text(record, &self.version_path),
            lookup_text(record, &self.cloud_path),
            lookup_text(record, &self.api_url_path),
            lookup_text(record, &self.ready_nodes_path),
            lookup_text(record, &self.total_nodes_path),
            lookup_text(record, &self.ingress_status_path),
            operators,
        ]
    }
}

/// Build the summary table, one row per cluster in identifier order
pub fn summary_table(clusters: &ClusterMap, schema: &SummarySchema) -> Result<Table> {
    let mut table = Table::new(SUMMARY_HEADER.iter().map(ToString::to_string).collect());
    for (id, record) in clusters {
        table.push_row(schema.row(id, record))?;
    }
    Ok(table)
}

/// Aggregate operator health
///
/// `"Healthy"` when every operator reports the healthy status, otherwise
/// `"Unhealthy (<healthy>/<total>)"`. An operator entry is either an
/// object with a `status` field or a bare status string. Anything that is
/// not a map of operators yields an empty cell.
pub fn operator_health(operators: &Value, healthy_value: &str) -> String {
    let Value::Object(map) = operators else {
        return String::new();
    };

    let total = map.len();
    let healthy = map
        .values()
        .filter(|op| operator_status(op) == Some(healthy_value))
        .count();

    if healthy == total {
        "Healthy".to_string()
    } else {
        format!("Unhealthy ({healthy}/{total})")
    }
}

fn operator_status(operator: &Value) -> Option<&str> {
    match operator {
        Value::String(s) => Some(s.as_str()),
        Value::Object(fields) => fields.get("status").and_then(Value::as_str),
        _ => None,
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, part| current.get(part))
}

/// Scalar at `path` rendered as text, `""` when missing or not a scalar
fn lookup_text(value: &Value, path: &str) -> String {
    match lookup(value, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => format_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
