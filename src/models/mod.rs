//! Data models for a completed transformation run and its enrichment.
//!
//! `ProcessResult` is what the transformation engine hands over once it has
//! rewritten a set of files. It is immutable after construction; renderers
//! only ever see `&ProcessResult`.

pub mod docs;

use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Diff of one rewritten file plus the transformations that touched it.
pub struct FileDiff {
    relative_file_path: String,
    diff: String,
    #[serde(default)]
    applied_transformation_ids: Vec<String>,
}

impl FileDiff {
    pub fn new(
        relative_file_path: impl Into<String>,
        diff: impl Into<String>,
        applied_transformation_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            relative_file_path: relative_file_path.into(),
            diff: diff.into(),
            applied_transformation_ids: applied_transformation_ids
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    pub fn relative_file_path(&self) -> &str {
        &self.relative_file_path
    }

    /// Unified diff text. Never reparsed here.
    pub fn diff(&self) -> &str {
        &self.diff
    }

    /// Identifiers exactly as the engine reported them.
    pub fn applied_transformation_ids(&self) -> &[String] {
        &self.applied_transformation_ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A per-file failure reported by the engine.
pub struct ErrorRecord {
    message: String,
    relative_file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    causing_transformation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>, relative_file_path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            relative_file_path: relative_file_path.into(),
            causing_transformation_id: None,
            line: None,
        }
    }

    pub fn with_cause(mut self, transformation_id: impl Into<String>) -> Self {
        self.causing_transformation_id = Some(transformation_id.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn relative_file_path(&self) -> &str {
        &self.relative_file_path
    }

    pub fn causing_transformation_id(&self) -> Option<&str> {
        self.causing_transformation_id.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A transformation identifier paired with its changelog reference, if any.
pub struct ChangelogEntry {
    #[serde(rename = "rector")]
    pub transformation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}

/// Summary of one completed transformation run.
///
/// File diffs are keyed by their own relative path, so a diff can never be
/// filed under a path other than the one it describes. Counters are carried
/// verbatim from the engine and are unrelated to the number of diffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProcessResult", into = "RawProcessResult")]
pub struct ProcessResult {
    config_path: String,
    file_diffs: HashMap<String, FileDiff>,
    errors: Vec<ErrorRecord>,
    removed_and_added_files_count: usize,
    removed_node_count: usize,
}

impl ProcessResult {
    pub fn builder(config_path: impl Into<String>) -> ProcessResultBuilder {
        ProcessResultBuilder {
            inner: ProcessResult {
                config_path: config_path.into(),
                file_diffs: HashMap::new(),
                errors: Vec::new(),
                removed_and_added_files_count: 0,
                removed_node_count: 0,
            },
        }
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn file_diffs(&self) -> &HashMap<String, FileDiff> {
        &self.file_diffs
    }

    /// File diffs in canonical order: ascending byte-wise path order.
    pub fn sorted_file_diffs(&self) -> Vec<&FileDiff> {
        let mut diffs: Vec<&FileDiff> = self.file_diffs.values().collect();
        diffs.sort_by(|a, b| a.relative_file_path.cmp(&b.relative_file_path));
        diffs
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn removed_and_added_files_count(&self) -> usize {
        self.removed_and_added_files_count
    }

    pub fn removed_node_count(&self) -> usize {
        self.removed_node_count
    }
}

/// Incremental construction of a `ProcessResult`.
pub struct ProcessResultBuilder {
    inner: ProcessResult,
}

impl ProcessResultBuilder {
    /// Add a file diff. A second diff for the same path is rejected.
    pub fn file_diff(mut self, diff: FileDiff) -> ReportResult<Self> {
        if self.inner.file_diffs.contains_key(&diff.relative_file_path) {
            return Err(ReportError::DuplicateFilePath(diff.relative_file_path));
        }
        self.inner
            .file_diffs
            .insert(diff.relative_file_path.clone(), diff);
        Ok(self)
    }

    pub fn error(mut self, error: ErrorRecord) -> Self {
        self.inner.errors.push(error);
        self
    }

    pub fn removed_and_added_files_count(mut self, count: usize) -> Self {
        self.inner.removed_and_added_files_count = count;
        self
    }

    pub fn removed_node_count(mut self, count: usize) -> Self {
        self.inner.removed_node_count = count;
        self
    }

    pub fn build(self) -> ProcessResult {
        self.inner
    }
}

#[derive(Serialize, Deserialize)]
/// Wire shape of the engine hand-off document.
struct RawProcessResult {
    #[serde(default)]
    config_path: String,
    #[serde(default)]
    file_diffs: Vec<FileDiff>,
    #[serde(default)]
    errors: Vec<ErrorRecord>,
    #[serde(default)]
    removed_and_added_files_count: usize,
    #[serde(default)]
    removed_node_count: usize,
}

impl TryFrom<RawProcessResult> for ProcessResult {
    type Error = ReportError;

    fn try_from(raw: RawProcessResult) -> Result<Self, Self::Error> {
        let mut builder = ProcessResult::builder(raw.config_path)
            .removed_and_added_files_count(raw.removed_and_added_files_count)
            .removed_node_count(raw.removed_node_count);
        for diff in raw.file_diffs {
            builder = builder.file_diff(diff)?;
        }
        for error in raw.errors {
            builder = builder.error(error);
        }
        Ok(builder.build())
    }
}

impl From<ProcessResult> for RawProcessResult {
    fn from(result: ProcessResult) -> Self {
        let file_diffs = result
            .sorted_file_diffs()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        RawProcessResult {
            config_path: result.config_path,
            file_diffs,
            errors: result.errors,
            removed_and_added_files_count: result.removed_and_added_files_count,
            removed_node_count: result.removed_node_count,
        }
    }
}
