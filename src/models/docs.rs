//! Documentation index: per-identifier metadata declared by transformations.
//!
//! The index is static data for the lifetime of the process. It is built
//! explicitly and handed to the changelog resolver, so tests can substitute
//! their own fixtures.

use crate::error::{ReportError, ReportResult};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
/// Documentation declared for one transformation identifier.
pub struct RuleDoc {
    #[serde(default)]
    pub summary: Option<String>,
    /// Free-form doc-block text; may carry `@changelog <ref>` tags.
    #[serde(default)]
    pub doc: Option<String>,
    /// Explicit changelog reference. Takes precedence over tags in `doc`.
    #[serde(default)]
    pub changelog: Option<String>,
}

/// Lookup seam for documentation metadata keyed by identifier.
pub trait DocumentationSource: Send + Sync {
    fn lookup(&self, transformation_id: &str) -> Option<RuleDoc>;
}

#[derive(Debug, Default, Clone, Deserialize)]
/// Immutable in-memory documentation index.
pub struct DocIndex {
    #[serde(default)]
    rules: BTreeMap<String, RuleDoc>,
}

impl DocIndex {
    pub fn new(rules: impl IntoIterator<Item = (String, RuleDoc)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Parse a TOML index: one `[rules."<id>"]` table per identifier.
    pub fn from_toml_str(s: &str) -> ReportResult<Self> {
        toml::from_str(s).map_err(|e| ReportError::DocIndex {
            format: "toml",
            message: e.to_string(),
        })
    }

    pub fn from_json_str(s: &str) -> ReportResult<Self> {
        serde_json::from_str(s).map_err(|e| ReportError::DocIndex {
            format: "json",
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(s: &str) -> ReportResult<Self> {
        serde_yaml::from_str(s).map_err(|e| ReportError::DocIndex {
            format: "yaml",
            message: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl DocumentationSource for DocIndex {
    fn lookup(&self, transformation_id: &str) -> Option<RuleDoc> {
        self.rules.get(transformation_id).cloned()
    }
}
