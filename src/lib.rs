// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # cluster-report
//!
//! Polls a cluster status API, flattens the nested per-cluster JSON into a
//! table and publishes it to a spreadsheet.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cluster_report::config::ReportConfig;
//! use cluster_report::pipeline::ReportPipeline;
//! use cluster_report::sink::{ConsoleFormat, ConsoleSink};
//!
//! #[tokio::main]
//! async fn main() -> cluster_report::Result<()> {
//!     let config = ReportConfig::from_env()?;
//!     let sink = ConsoleSink::stdout(ConsoleFormat::Pretty);
//!     let stats = ReportPipeline::new(config).run(&sink).await?;
//!     println!("{} clusters", stats.clusters);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────┐   ┌──────────────┐   ┌───────────┐   ┌─────────┐   ┌──────────┐
//! │  Auth  │──▶│ Status poll  │──▶│ Flattener │──▶│  Table  │──▶│   Sink   │
//! ├────────┤   ├──────────────┤   ├───────────┤   ├─────────┤   ├──────────┤
//! │ Login  │   │ Trigger POST │   │ a_b_c     │   │ Dynamic │   │ Sheets   │
//! │ SA JWT │   │ Bounded GETs │   │ 1st elem  │   │ Summary │   │ Console  │
//! └────────┘   └──────────────┘   └───────────┘   └─────────┘   └──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication: admin login and service-account tokens
pub mod auth;

/// HTTP client with a hard per-request timeout
pub mod http;

/// JSON response decoding
pub mod decode;

/// Trigger-then-poll status retrieval
pub mod status;

/// Nested JSON to flat column paths
pub mod flatten;

/// Report table assembly
pub mod table;

/// Report destinations
pub mod sink;

/// End-to-end report run
pub mod pipeline;

/// Environment and flag configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ReportConfig;
pub use pipeline::{PipelineStats, ReportPipeline};
pub use table::Table;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
