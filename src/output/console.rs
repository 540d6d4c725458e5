//! Human-readable console report.
//!
//! Lists changed files in canonical order with their diffs and applied
//! rules, then any errors, then a one-line summary. Colors are used unless
//! disabled at construction or by `NO_COLOR`.

use super::Formatter;
use crate::changelog::ChangelogResolver;
use crate::error::ReportResult;
use crate::models::{ErrorRecord, FileDiff, ProcessResult};
use owo_colors::OwoColorize;
use std::io::Write;
use std::sync::Arc;

pub const NAME: &str = "console";

fn use_colors(requested: bool) -> bool {
    requested && std::env::var_os("NO_COLOR").is_none()
}

pub struct ConsoleFormatter {
    resolver: Arc<ChangelogResolver>,
    colors: bool,
}

impl ConsoleFormatter {
    pub fn new(resolver: Arc<ChangelogResolver>, colors: bool) -> Self {
        Self { resolver, colors }
    }

    fn write_file(&self, out: &mut dyn Write, index: usize, diff: &FileDiff) -> ReportResult<()> {
        let color = use_colors(self.colors);
        let header = format!("{}) {}", index + 1, diff.relative_file_path());
        if color {
            writeln!(out, "{}", header.bold())?;
        } else {
            writeln!(out, "{}", header)?;
        }
        if !diff.diff().is_empty() {
            writeln!(out, "    ---------- begin diff ----------")?;
            for line in diff.diff().lines() {
                if color && line.starts_with('+') && !line.starts_with("+++") {
                    writeln!(out, "{}", line.green())?;
                } else if color && line.starts_with('-') && !line.starts_with("---") {
                    writeln!(out, "{}", line.red())?;
                } else {
                    writeln!(out, "{}", line)?;
                }
            }
            writeln!(out, "    ----------- end diff -----------")?;
        }
        let entries = self.resolver.resolve(diff.applied_transformation_ids());
        if !entries.is_empty() {
            writeln!(out, "Applied rules:")?;
            for e in entries {
                match e.changelog {
                    Some(ch) => writeln!(out, " * {} ({})", e.transformation_id, ch)?,
                    None => writeln!(out, " * {}", e.transformation_id)?,
                }
            }
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_error(&self, out: &mut dyn Write, error: &ErrorRecord) -> ReportResult<()> {
        let color = use_colors(self.colors);
        let loc = match error.line() {
            Some(line) => format!("{}:{}", error.relative_file_path(), line),
            None => error.relative_file_path().to_string(),
        };
        let tag = if color {
            "⟦error⟧".red().bold().to_string()
        } else {
            "⟦error⟧".to_string()
        };
        match error.causing_transformation_id() {
            Some(cause) => writeln!(
                out,
                "{} {} — {} (caused by {})",
                tag,
                loc,
                error.message(),
                cause
            )?,
            None => writeln!(out, "{} {} — {}", tag, loc, error.message())?,
        }
        Ok(())
    }
}

impl Formatter for ConsoleFormatter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn render(&self, result: &ProcessResult, out: &mut dyn Write) -> ReportResult<()> {
        let diffs = result.sorted_file_diffs();
        if !diffs.is_empty() {
            writeln!(
                out,
                "{} file{} with changes",
                diffs.len(),
                if diffs.len() == 1 { "" } else { "s" }
            )?;
            writeln!(out, "===================")?;
            writeln!(out)?;
            for (i, d) in diffs.iter().enumerate() {
                self.write_file(out, i, d)?;
            }
        }
        for e in result.errors() {
            self.write_error(out, e)?;
        }
        let summary = format!(
            "— Summary — changed_files={} removed_and_added_files={} removed_nodes={} errors={}",
            result.file_diffs().len(),
            result.removed_and_added_files_count(),
            result.removed_node_count(),
            result.errors().len()
        );
        if use_colors(self.colors) {
            writeln!(out, "{}", summary.bold())?;
        } else {
            writeln!(out, "{}", summary)?;
        }
        out.flush()?;
        Ok(())
    }
}
