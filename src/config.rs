//! Configuration discovery and effective settings resolution.
//!
//! Shiftlog reads `shiftlog.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `output`: `json`
//! - `docs`: none (every applied rule renders without a changelog)
//! - `color`: true
//! - `report_file`: none (stdout)
//!
//! Overrides precedence: CLI > config file > defaults.
//!
//! This module also loads the two input documents the binary needs: the
//! engine's result document and the documentation index.

use crate::models::docs::DocIndex;
use crate::models::ProcessResult;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_OUTPUT: &str = "json";

const CONFIG_FILES: [&str; 3] = ["shiftlog.toml", "shiftlog.yaml", "shiftlog.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `shiftlog.toml|yaml`.
pub struct ShiftlogConfig {
    pub output: Option<String>,
    pub docs: Option<String>,
    pub color: Option<bool>,
    pub report_file: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    /// Documentation index, resolved against `repo_root` when relative.
    pub docs: Option<PathBuf>,
    pub color: bool,
    pub report_file: Option<PathBuf>,
    pub config_found: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `shiftlog.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ShiftlogConfig` from `shiftlog.toml` or `shiftlog.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<ShiftlogConfig>> {
    let toml_path = root.join("shiftlog.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)
            .with_context(|| format!("read {}", toml_path.display()))?;
        let cfg: ShiftlogConfig =
            toml::from_str(&s).with_context(|| format!("parse {}", toml_path.display()))?;
        return Ok(Some(cfg));
    }
    for yml in ["shiftlog.yaml", "shiftlog.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
            let cfg: ShiftlogConfig =
                serde_yaml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_docs: Option<&str>,
    cli_report_file: Option<&str>,
    cli_no_color: bool,
) -> Result<Effective> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    debug!(root = %repo_root.display(), config_found, "resolved repository root");

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let docs = cli_docs
        .map(|s| s.to_string())
        .or(cfg.docs)
        .map(|d| repo_root.join(d));
    let report_file = cli_report_file
        .map(|s| s.to_string())
        .or(cfg.report_file)
        .map(|f| repo_root.join(f));
    let color = !cli_no_color && cfg.color.unwrap_or(true);

    Ok(Effective {
        repo_root,
        output,
        docs,
        color,
        report_file,
        config_found,
    })
}

/// Load a documentation index, picking the parser by file extension.
pub fn load_doc_index(path: &Path) -> Result<DocIndex> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read documentation index {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let index = match ext.as_str() {
        "toml" => DocIndex::from_toml_str(&s)?,
        "json" => DocIndex::from_json_str(&s)?,
        "yaml" | "yml" => DocIndex::from_yaml_str(&s)?,
        other => bail!(
            "unsupported documentation index extension '{}' for {} (expected toml, json, yaml)",
            other,
            path.display()
        ),
    };
    debug!(rules = index.len(), path = %path.display(), "loaded documentation index");
    Ok(index)
}

/// Read the engine's result document from `input` (`-` for stdin).
///
/// YAML is used for `.yaml|.yml` paths; everything else is JSON.
pub fn load_result(input: &str) -> Result<ProcessResult> {
    if input == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read result document from stdin")?;
        return serde_json::from_str(&s).context("parse result document from stdin");
    }
    let path = Path::new(input);
    let s = fs::read_to_string(path)
        .with_context(|| format!("read result document {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).with_context(|| format!("parse {}", path.display()))
    } else {
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
    }
}
