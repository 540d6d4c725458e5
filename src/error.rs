//! Error taxonomy shared by the data model, resolver, and renderers.
//!
//! Partial transformation errors are not represented here: they are data
//! carried inside `ProcessResult` and rendered like everything else.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown output format '{name}' (available: {})", .available.join(", "))]
    UnknownFormatter { name: String, available: Vec<String> },
    #[error("output format '{0}' is already registered")]
    DuplicateFormatter(String),
    #[error("duplicate file diff for path '{0}'")]
    DuplicateFilePath(String),
    #[error("failed to encode report field '{field}': {source}")]
    Serialize {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {format} documentation index: {message}")]
    DocIndex {
        format: &'static str,
        message: String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ReportError {
    /// True for errors the caller caused by misconfiguring the run, as
    /// opposed to failures while producing output.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReportError::UnknownFormatter { .. }
                | ReportError::DuplicateFormatter(_)
                | ReportError::DocIndex { .. }
        )
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
