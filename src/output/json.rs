//! Structured JSON report.
//!
//! Shape (keys in this order):
//! - `meta.config`
//! - `totals.{changed_files,removed_and_added_files_count,removed_node_count,errors}`
//! - `file_diffs`: `{file, diff, applied_rectors, applied_rectors_with_changelog}` per path
//! - `changed_files`: the same paths, flattened
//! - `errors`: only when the run reported any
//!
//! Paths are visited in ascending order so repeated runs produce
//! byte-identical output. Absent optional fields are omitted, never `null`.

use super::Formatter;
use crate::changelog::ChangelogResolver;
use crate::error::{ReportError, ReportResult};
use crate::models::{ChangelogEntry, ErrorRecord, ProcessResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as JsonVal};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

pub const NAME: &str = "json";

#[derive(Serialize)]
struct Meta<'a> {
    config: &'a str,
}

#[derive(Serialize)]
struct Totals {
    changed_files: usize,
    removed_and_added_files_count: usize,
    removed_node_count: usize,
    errors: usize,
}

#[derive(Serialize)]
struct FileDiffRow<'a> {
    file: &'a str,
    diff: &'a str,
    applied_rectors: &'a [String],
    applied_rectors_with_changelog: Vec<ChangelogEntry>,
}

#[derive(Serialize)]
struct ErrorRow<'a> {
    message: &'a str,
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

impl<'a> From<&'a ErrorRecord> for ErrorRow<'a> {
    fn from(e: &'a ErrorRecord) -> Self {
        ErrorRow {
            message: e.message(),
            file: e.relative_file_path(),
            caused_by: e.causing_transformation_id(),
            line: e.line(),
        }
    }
}

fn section<T: Serialize>(field: &'static str, value: &T) -> ReportResult<JsonVal> {
    serde_json::to_value(value).map_err(|source| ReportError::Serialize { field, source })
}

/// Compose the report object (pure) for testing/snapshot purposes.
pub fn compose_report_json(
    result: &ProcessResult,
    resolver: &ChangelogResolver,
) -> ReportResult<JsonVal> {
    let diffs = result.sorted_file_diffs();
    debug!(
        files = diffs.len(),
        errors = result.errors().len(),
        "composing json report"
    );

    let rows: Vec<FileDiffRow> = diffs
        .iter()
        .map(|d| FileDiffRow {
            file: d.relative_file_path(),
            diff: d.diff(),
            applied_rectors: d.applied_transformation_ids(),
            applied_rectors_with_changelog: resolver.resolve(d.applied_transformation_ids()),
        })
        .collect();
    let changed_files: Vec<&str> = diffs.iter().map(|d| d.relative_file_path()).collect();
    let totals = Totals {
        changed_files: result.file_diffs().len(),
        removed_and_added_files_count: result.removed_and_added_files_count(),
        removed_node_count: result.removed_node_count(),
        errors: result.errors().len(),
    };

    let mut out = Map::new();
    out.insert(
        "meta".into(),
        section("meta", &Meta {
            config: result.config_path(),
        })?,
    );
    out.insert("totals".into(), section("totals", &totals)?);
    out.insert("file_diffs".into(), section("file_diffs", &rows)?);
    out.insert("changed_files".into(), section("changed_files", &changed_files)?);
    if !result.errors().is_empty() {
        let errors: Vec<ErrorRow> = result.errors().iter().map(ErrorRow::from).collect();
        out.insert("errors".into(), section("errors", &errors)?);
    }
    Ok(JsonVal::Object(out))
}

/// Encode with a four-space indent followed by one trailing newline.
pub fn encode_pretty(report: &JsonVal) -> ReportResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    report
        .serialize(&mut ser)
        .map_err(|source| ReportError::Serialize {
            field: "report",
            source,
        })?;
    buf.push(b'\n');
    Ok(buf)
}

pub struct JsonFormatter {
    resolver: Arc<ChangelogResolver>,
}

impl JsonFormatter {
    pub fn new(resolver: Arc<ChangelogResolver>) -> Self {
        Self { resolver }
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn render(&self, result: &ProcessResult, out: &mut dyn Write) -> ReportResult<()> {
        let report = compose_report_json(result, &self.resolver)?;
        out.write_all(&encode_pretty(&report)?)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::docs::{DocIndex, RuleDoc};
    use crate::models::FileDiff;

    fn resolver() -> ChangelogResolver {
        ChangelogResolver::new(DocIndex::new([(
            "RuleA".to_string(),
            RuleDoc {
                changelog: Some("https://example.org/rule-a".into()),
                ..Default::default()
            },
        )]))
    }

    fn sample() -> ProcessResult {
        ProcessResult::builder("rector.php")
            .file_diff(FileDiff::new("b.php", "-old\n+new\n", ["RuleA"]))
            .unwrap()
            .file_diff(FileDiff::new("a.php", "", Vec::<String>::new()))
            .unwrap()
            .removed_node_count(2)
            .build()
    }

    #[test]
    fn test_compose_sorts_paths_and_copies_totals() {
        let out = compose_report_json(&sample(), &resolver()).unwrap();
        assert_eq!(out["meta"]["config"], "rector.php");
        assert_eq!(out["file_diffs"][0]["file"], "a.php");
        assert_eq!(out["file_diffs"][1]["file"], "b.php");
        assert_eq!(out["changed_files"], serde_json::json!(["a.php", "b.php"]));
        assert_eq!(
            out["totals"],
            serde_json::json!({
                "changed_files": 2,
                "removed_and_added_files_count": 0,
                "removed_node_count": 2,
                "errors": 0
            })
        );
        assert!(out.get("errors").is_none());
    }

    #[test]
    fn test_compose_enriches_applied_rules() {
        let out = compose_report_json(&sample(), &resolver()).unwrap();
        let b = &out["file_diffs"][1];
        assert_eq!(b["applied_rectors"], serde_json::json!(["RuleA"]));
        assert_eq!(
            b["applied_rectors_with_changelog"],
            serde_json::json!([{"rector": "RuleA", "changelog": "https://example.org/rule-a"}])
        );
    }

    #[test]
    fn test_undocumented_rule_has_no_changelog_key() {
        let result = ProcessResult::builder("rector.php")
            .file_diff(FileDiff::new("x.php", "", ["Undocumented"]))
            .unwrap()
            .build();
        let out = compose_report_json(&result, &resolver()).unwrap();
        let entry = &out["file_diffs"][0]["applied_rectors_with_changelog"][0];
        assert_eq!(entry["rector"], "Undocumented");
        assert!(entry.get("changelog").is_none());
    }

    #[test]
    fn test_error_fields_omitted_when_absent() {
        let result = ProcessResult::builder("rector.php")
            .error(ErrorRecord::new("parse failure", "c.php").with_line(10))
            .error(ErrorRecord::new("crash", "d.php").with_cause("RuleA").with_line(0))
            .error(ErrorRecord::new("bare", "e.php"))
            .build();
        let out = compose_report_json(&result, &resolver()).unwrap();
        assert_eq!(out["totals"]["errors"], 3);
        assert_eq!(
            out["errors"][0],
            serde_json::json!({"message": "parse failure", "file": "c.php", "line": 10})
        );
        assert_eq!(out["errors"][1]["caused_by"], "RuleA");
        assert_eq!(out["errors"][1]["line"], 0);
        assert_eq!(
            out["errors"][2],
            serde_json::json!({"message": "bare", "file": "e.php"})
        );
    }

    #[test]
    fn test_empty_result_still_has_summary() {
        let result = ProcessResult::builder("").build();
        let text = JsonFormatter::new(Arc::new(resolver()))
            .render_to_string(&result)
            .unwrap();
        let expected = "{\n    \"meta\": {\n        \"config\": \"\"\n    },\n    \"totals\": {\n        \"changed_files\": 0,\n        \"removed_and_added_files_count\": 0,\n        \"removed_node_count\": 0,\n        \"errors\": 0\n    },\n    \"file_diffs\": [],\n    \"changed_files\": []\n}\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_top_level_key_order() {
        let result = ProcessResult::builder("rector.php")
            .error(ErrorRecord::new("m", "f.php"))
            .build();
        let out = compose_report_json(&result, &resolver()).unwrap();
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["meta", "totals", "file_diffs", "changed_files", "errors"]
        );
    }

    #[test]
    fn test_slashes_are_not_escaped() {
        let result = ProcessResult::builder("config/rector.php")
            .file_diff(FileDiff::new("src/Ünïcode.php", "", Vec::<String>::new()))
            .unwrap()
            .build();
        let text = JsonFormatter::new(Arc::new(resolver()))
            .render_to_string(&result)
            .unwrap();
        assert!(text.contains("\"config/rector.php\""));
        assert!(text.contains("\"src/Ünïcode.php\""));
        assert!(text.ends_with("}\n"));
        assert!(!text.ends_with("\n\n"));
    }
}
