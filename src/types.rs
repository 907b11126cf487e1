//! Common types used throughout cluster-report
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// One flattened cluster: column path -> cell text, ordered by column path
pub type FlatRecord = BTreeMap<String, String>;

/// Cluster identifier -> raw nested cluster record, ordered by identifier
pub type ClusterMap = BTreeMap<String, JsonValue>;

// ============================================================================
// Report Mode
// ============================================================================

/// Shape of the produced table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Every leaf of every cluster record becomes a column
    #[default]
    Dynamic,
    /// Fixed 8-column health summary
    Summary,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::Dynamic => write!(f, "dynamic"),
            ReportMode::Summary => write!(f, "summary"),
        }
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dynamic" | "full" => Ok(ReportMode::Dynamic),
            "summary" | "fixed" => Ok(ReportMode::Summary),
            other => Err(format!("unknown report mode '{other}', expected 'dynamic' or 'summary'")),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mode_default() {
        assert_eq!(ReportMode::default(), ReportMode::Dynamic);
    }

    #[test]
    fn test_report_mode_parse() {
        assert_eq!("dynamic".parse::<ReportMode>().unwrap(), ReportMode::Dynamic);
        assert_eq!("Summary".parse::<ReportMode>().unwrap(), ReportMode::Summary);
        assert_eq!(" fixed ".parse::<ReportMode>().unwrap(), ReportMode::Summary);
        assert!("table".parse::<ReportMode>().is_err());
    }

    #[test]
    fn test_report_mode_serde() {
        let mode: ReportMode = serde_json::from_str("\"summary\"").unwrap();
        assert_eq!(mode, ReportMode::Summary);

        let json = serde_json::to_string(&ReportMode::Dynamic).unwrap();
        assert_eq!(json, "\"dynamic\"");
        assert_eq!(ReportMode::Summary.to_string(), "summary");
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(Some("   ".to_string()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }
}
