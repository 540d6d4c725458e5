//! Property-based tests for the JSON report.
//!
//! These tests verify determinism, canonical path ordering, verbatim
//! counters, and the presence rules of the error section.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

use shiftlog::output::json::compose_report_json;
use shiftlog::{
    ChangelogResolver, DocIndex, ErrorRecord, FileDiff, Formatter, FormatterRegistry,
    ProcessResult, RuleDoc,
};

// ============================================================================
// Proptest Strategies for generating test data
// ============================================================================

/// Strategy for generating rule identifiers, some of which are documented.
fn arb_rule_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("RuleA".to_string()),
        Just("RuleB".to_string()),
        prop::string::string_regex("Rule[A-Z][a-z]{0,6}").expect("valid regex"),
    ]
}

/// Strategy for generating relative file paths.
fn arb_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("(src/|tests/)?[a-zA-Z][a-zA-Z0-9_]{0,10}\\.php").expect("valid regex")
}

/// Strategy for generating valid ErrorRecord.
fn arb_error() -> impl Strategy<Value = ErrorRecord> {
    (
        "[a-z ]{1,20}",
        arb_path(),
        prop::option::of(arb_rule_id()),
        prop::option::of(0u32..500),
    )
        .prop_map(|(message, path, cause, line)| {
            let mut rec = ErrorRecord::new(message, path);
            if let Some(c) = cause {
                rec = rec.with_cause(c);
            }
            if let Some(l) = line {
                rec = rec.with_line(l);
            }
            rec
        })
}

/// Strategy for generating a ProcessResult with unique paths in arbitrary order.
fn arb_result() -> impl Strategy<Value = ProcessResult> {
    (
        prop::collection::btree_set(arb_path(), 0..8),
        prop::collection::vec(prop::collection::vec(arb_rule_id(), 0..4), 8),
        prop::collection::vec(arb_error(), 0..5),
        0usize..50,
        0usize..50,
        any::<bool>(),
    )
        .prop_map(|(paths, ids, errors, added, nodes, reverse)| {
            let mut paths: Vec<String> = paths.into_iter().collect();
            if reverse {
                paths.reverse();
            }
            let mut builder = ProcessResult::builder("rector.php")
                .removed_and_added_files_count(added)
                .removed_node_count(nodes);
            for (i, p) in paths.into_iter().enumerate() {
                builder = builder
                    .file_diff(FileDiff::new(p, "@@ -1 +1 @@\n-a\n+b\n", ids[i].clone()))
                    .expect("paths are unique");
            }
            for e in errors {
                builder = builder.error(e);
            }
            builder.build()
        })
}

fn resolver() -> Arc<ChangelogResolver> {
    Arc::new(ChangelogResolver::new(DocIndex::new([(
        "RuleA".to_string(),
        RuleDoc {
            changelog: Some("https://example.org/a".into()),
            ..Default::default()
        },
    )])))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rendering_is_deterministic(result in arb_result()) {
        let registry = FormatterRegistry::with_defaults(resolver(), false);
        let json = registry.get("json").expect("json registered");
        let first = json.render_to_string(&result).expect("render");
        let second = json.render_to_string(&result).expect("render");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn file_paths_are_strictly_ascending(result in arb_result()) {
        let out = compose_report_json(&result, &resolver()).expect("compose");
        let files: Vec<String> = out["file_diffs"]
            .as_array()
            .expect("array")
            .iter()
            .map(|r| r["file"].as_str().expect("file").to_string())
            .collect();
        for pair in files.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        let flat: Vec<String> = out["changed_files"]
            .as_array()
            .expect("array")
            .iter()
            .map(|v| v.as_str().expect("path").to_string())
            .collect();
        prop_assert_eq!(files, flat);
    }

    #[test]
    fn totals_are_carried_verbatim(result in arb_result()) {
        let out = compose_report_json(&result, &resolver()).expect("compose");
        prop_assert_eq!(out["totals"]["changed_files"].as_u64(), Some(result.file_diffs().len() as u64));
        prop_assert_eq!(
            out["totals"]["removed_and_added_files_count"].as_u64(),
            Some(result.removed_and_added_files_count() as u64)
        );
        prop_assert_eq!(out["totals"]["removed_node_count"].as_u64(), Some(result.removed_node_count() as u64));
        prop_assert_eq!(out["totals"]["errors"].as_u64(), Some(result.errors().len() as u64));
    }

    #[test]
    fn error_section_present_only_when_nonempty(result in arb_result()) {
        let out = compose_report_json(&result, &resolver()).expect("compose");
        match out.get("errors") {
            None => prop_assert!(result.errors().is_empty()),
            Some(errors) => {
                let rows = errors.as_array().expect("array");
                prop_assert_eq!(rows.len(), result.errors().len());
                for (row, rec) in rows.iter().zip(result.errors()) {
                    prop_assert_eq!(row.get("line").is_some(), rec.line().is_some());
                    prop_assert_eq!(row.get("caused_by").is_some(), rec.causing_transformation_id().is_some());
                }
            }
        }
    }

    #[test]
    fn every_applied_rule_gets_one_entry(result in arb_result()) {
        let out = compose_report_json(&result, &resolver()).expect("compose");
        for row in out["file_diffs"].as_array().expect("array") {
            let applied: BTreeSet<&str> = row["applied_rectors"]
                .as_array()
                .expect("array")
                .iter()
                .map(|v| v.as_str().expect("id"))
                .collect();
            let resolved: Vec<&str> = row["applied_rectors_with_changelog"]
                .as_array()
                .expect("array")
                .iter()
                .map(|e| e["rector"].as_str().expect("id"))
                .collect();
            prop_assert_eq!(resolved, applied.into_iter().collect::<Vec<_>>());
        }
    }
}
