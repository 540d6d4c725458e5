//! Shiftlog core library.
//!
//! This crate aggregates the outcome of an automated source-transformation
//! run (per-file diffs, applied rule identifiers, errors, counters), enriches
//! applied rules with changelog references, and renders a deterministic
//! report.
//!
//! High-level modules:
//! - `models`: Immutable run result (`ProcessResult`) and documentation index.
//! - `changelog`: Identifier to changelog resolution with a process-wide cache.
//! - `output`: Formatter contract, name registry, and the `json`/`console` formatters.
//! - `error`: Error taxonomy.
//! - `config`: Discovery of `shiftlog.toml|yaml` for the binary.
//! - `cli`: CLI argument parsing (binary uses this).
pub mod changelog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;

pub use changelog::ChangelogResolver;
pub use error::{ReportError, ReportResult};
pub use models::docs::{DocIndex, DocumentationSource, RuleDoc};
pub use models::{ChangelogEntry, ErrorRecord, FileDiff, ProcessResult};
pub use output::{Formatter, FormatterRegistry};
