//! Changelog resolution for applied transformation identifiers.
//!
//! Every identifier yields exactly one entry. Identifiers without a declared
//! changelog, or without any documentation at all, get an entry whose
//! `changelog` is `None`; one undocumented rule never fails the batch.
//!
//! Entries come back in ascending lexicographic identifier order with
//! duplicates collapsed, independent of how the caller ordered its input.

use crate::models::docs::{DocumentationSource, RuleDoc};
use crate::models::ChangelogEntry;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::{OnceLock, RwLock};
use tracing::debug;

fn changelog_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Matches doc-block lines such as ` * @changelog https://...`
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t/*]*@changelog[ \t]+(\S+)").expect("changelog tag regex")
    })
}

/// Pick the changelog reference from a documentation record.
pub fn extract_changelog(doc: &RuleDoc) -> Option<String> {
    if let Some(explicit) = doc.changelog.as_deref().map(str::trim) {
        if !explicit.is_empty() {
            return Some(explicit.to_string());
        }
    }
    let text = doc.doc.as_deref()?;
    changelog_tag()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Resolves identifiers against a documentation source, caching each
/// identifier's changelog for the life of the resolver.
pub struct ChangelogResolver {
    source: Box<dyn DocumentationSource>,
    cache: RwLock<HashMap<String, Option<String>>>,
}

impl ChangelogResolver {
    pub fn new(source: impl DocumentationSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// One entry per distinct identifier, sorted.
    pub fn resolve<S: AsRef<str>>(&self, identifiers: &[S]) -> Vec<ChangelogEntry> {
        let distinct: BTreeSet<&str> = identifiers.iter().map(AsRef::as_ref).collect();
        distinct
            .into_iter()
            .map(|id| ChangelogEntry {
                transformation_id: id.to_string(),
                changelog: self.changelog_for(id),
            })
            .collect()
    }

    /// Like `resolve`, keeping only identifiers that declare a changelog.
    pub fn resolve_documented<S: AsRef<str>>(&self, identifiers: &[S]) -> Vec<ChangelogEntry> {
        self.resolve(identifiers)
            .into_iter()
            .filter(|e| e.changelog.is_some())
            .collect()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    fn changelog_for(&self, id: &str) -> Option<String> {
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(id) {
                return hit.clone();
            }
        }
        debug!(transformation_id = id, "changelog cache miss");
        let changelog = match self.source.lookup(id) {
            Some(doc) => extract_changelog(&doc),
            None => {
                debug!(transformation_id = id, "no documentation declared");
                None
            }
        };
        // Poisoned lock: skip caching, the value is still valid.
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id.to_string(), changelog.clone());
        }
        changelog
    }
}
