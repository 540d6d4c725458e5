//! Output formatters for a completed `ProcessResult`.
//!
//! Every formatter implements [`Formatter`] and is selected by name through
//! a [`FormatterRegistry`]. Registration is explicit; an unknown name is a
//! configuration error and never falls back to another formatter.
//!
//! Formatters:
//! - `json`: structured, deterministic report (see [`json`]).
//! - `console`: human-readable listing (see [`console`]).

pub mod console;
pub mod json;

use crate::changelog::ChangelogResolver;
use crate::error::{ReportError, ReportResult};
use crate::models::ProcessResult;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

pub use console::ConsoleFormatter;
pub use json::JsonFormatter;

/// Renders a `ProcessResult` into one output encoding.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Write the rendered report to `out`. The result is only read.
    fn render(&self, result: &ProcessResult, out: &mut dyn Write) -> ReportResult<()>;

    fn render_to_string(&self, result: &ProcessResult) -> ReportResult<String> {
        let mut buf = Vec::new();
        self.render(result, &mut buf)?;
        // Formatters only ever write UTF-8 text.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Name-keyed set of formatters.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: BTreeMap<&'static str, Box<dyn Formatter>>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `json` and `console` formatters.
    pub fn with_defaults(resolver: Arc<ChangelogResolver>, colors: bool) -> Self {
        let mut registry = Self::new();
        for formatter in [
            Box::new(JsonFormatter::new(resolver.clone())) as Box<dyn Formatter>,
            Box::new(ConsoleFormatter::new(resolver, colors)),
        ] {
            // Built-in names are distinct.
            let _ = registry.register(formatter);
        }
        registry
    }

    pub fn register(&mut self, formatter: Box<dyn Formatter>) -> ReportResult<()> {
        let name = formatter.name();
        if self.formatters.contains_key(name) {
            return Err(ReportError::DuplicateFormatter(name.to_string()));
        }
        self.formatters.insert(name, formatter);
        Ok(())
    }

    pub fn get(&self, name: &str) -> ReportResult<&dyn Formatter> {
        self.formatters
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| ReportError::UnknownFormatter {
                name: name.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            })
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&'static str> {
        self.formatters.keys().copied().collect()
    }
}
