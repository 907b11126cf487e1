//! Flattening of nested cluster records
//!
//! # Rules
//!
//! - Object keys join their parent path with `_` (`node_summary_ready`)
//! - Arrays contribute only their first element, under the same path, even
//!   when that element is a scalar
//! - Strings are kept as-is, numbers and booleans use their plain text,
//!   `null` becomes `null`
//! - Nothing here can fail

mod flattener;

pub use flattener::{flatten, format_number, Flattener, DEFAULT_SEPARATOR};
