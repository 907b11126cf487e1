//! JSON flattening
//!
//! Turns a nested JSON value into a [`FlatRecord`]: object keys are joined
//! with a separator, arrays contribute their first element only, and every
//! scalar leaf is rendered as text.
//!
//! Two renderings are fixed choices that sheets built by older tooling may
//! not match:
//!
//! - `null` is written as `null`, never `<nil>` or an empty cell.
//! - An array of scalars keeps its first element under the array's own
//!   path (`{"zones": ["a", "b"]}` gives `zones = a`) rather than being
//!   dropped without a column.

use crate::types::FlatRecord;
use serde_json::{Map, Number, Value};

/// Separator placed between nested object keys
pub const DEFAULT_SEPARATOR: &str = "_";

/// Magnitude from which integral floats keep their exponent notation
const PLAIN_FLOAT_LIMIT: f64 = 1e21;

/// Flattens nested JSON into path -> text records
#[derive(Debug, Clone)]
pub struct Flattener {
    separator: String,
}

impl Default for Flattener {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl Flattener {
    /// Create a flattener using `_` as separator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flattener with a custom separator
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// The key separator
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Flatten a value with no path prefix
    pub fn flatten(&self, value: &Value) -> FlatRecord {
        self.flatten_with_prefix(value, "")
    }

    /// Flatten a value, prefixing every produced path with `prefix`
    ///
    /// Never fails. A scalar reached with an empty prefix has no column
    /// name and is dropped.
    pub fn flatten_with_prefix(&self, value: &Value, prefix: &str) -> FlatRecord {
        let mut record = FlatRecord::new();
        self.flatten_into(value, prefix, &mut record);
        record
    }

    fn flatten_into(&self, value: &Value, prefix: &str, out: &mut FlatRecord) {
        match value {
            Value::Object(map) => {
                for (key, nested) in map {
                    let path = self.join(prefix, key);
                    self.flatten_into(nested, &path, out);
                }
            }
            // Only the first element is flattened
            Value::Array(items) => {
                if let Some(first) = items.first() {
                    self.flatten_into(first, prefix, out);
                }
            }
            Value::String(s) => insert_leaf(out, prefix, s.clone()),
            Value::Number(n) => insert_leaf(out, prefix, format_number(n)),
            Value::Bool(b) => insert_leaf(out, prefix, b.to_string()),
            Value::Null => insert_leaf(out, prefix, "null".to_string()),
        }
    }

    fn join(&self, prefix: &str, key: &str) -> String {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}{}{key}", self.separator)
        }
    }

    /// Re-nest a flat record by splitting its keys on the separator
    ///
    /// Leaves come back as JSON strings. Only exact for records whose
    /// original keys did not themselves contain the separator.
    pub fn unflatten(&self, record: &FlatRecord) -> Value {
        let mut root = Map::new();

        for (key, text) in record {
            let mut parts = key.split(self.separator.as_str()).peekable();
            let mut node = &mut root;

            while let Some(part) = parts.next() {
                if parts.peek().is_none() {
                    node.insert(part.to_string(), Value::String(text.clone()));
                    break;
                }

                let entry = node
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                let Value::Object(next) = entry else {
                    break;
                };
                node = next;
            }
        }

        Value::Object(root)
    }
}

fn insert_leaf(out: &mut FlatRecord, path: &str, text: String) {
    if !path.is_empty() {
        out.insert(path.to_string(), text);
    }
}

/// Render a JSON number the way a spreadsheet user expects to read it
///
/// Integers print as integers. Floats with no fractional part print
/// without a trailing `.0` (so `3.0` reads `3`) until they are large
/// enough to need an exponent.
pub fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < PLAIN_FLOAT_LIMIT => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

/// Flatten a value with the default separator
pub fn flatten(value: &Value) -> FlatRecord {
    Flattener::default().flatten(value)
}
