//! Sink module
//!
//! Destinations for the finished report table.
//!
//! # Overview
//!
//! Every sink implements [`TableSink`]: it receives the whole table and
//! replaces whatever the destination held before.
//!
//! - [`SheetsSink`] clears a Google Sheets range, then writes the grid
//! - [`ConsoleSink`] prints the table as aligned text or JSON lines

mod console;
mod sheets;
mod types;

pub use console::ConsoleSink;
pub use sheets::{range_start, SheetsSink, SheetsSinkConfig, SHEETS_API_URL, VALUE_INPUT_OPTION};
pub use types::{ConsoleFormat, TableSink};
