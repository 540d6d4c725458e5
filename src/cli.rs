//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shiftlog",
    version,
    about = "Render transformation-run change reports",
    long_about = "Shiftlog — renders the result of an automated source-transformation run (file diffs, applied rules, errors) into a deterministic report.\n\nConfiguration precedence: CLI > shiftlog.toml > defaults.",
    after_help = "Examples:\n  shiftlog render --input result.json\n  shiftlog render --input result.json --output console --docs rules.toml\n  engine run | shiftlog render --input - --report-file report.json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Log progress to stderr")]
    pub verbose: bool,
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Log debug details to stderr")]
    pub debug: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current shiftlog version.")]
    Version,
    /// Render a run result
    #[command(
        about = "Render a run result",
        long_about = "Read the engine's result document (JSON, or YAML by extension) and render it with the selected output format.",
        after_help = "Examples:\n  shiftlog render --input result.json\n  shiftlog render --input result.yaml --output console"
    )]
    Render {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Result document path, or '-' for stdin (default: -)")]
        input: Option<String>,
        #[arg(long, help = "Output format name: json|console (default: json)")]
        output: Option<String>,
        #[arg(long, help = "Documentation index with changelog references (.toml|.json|.yaml)")]
        docs: Option<String>,
        #[arg(long, help = "Write the report to this file instead of stdout")]
        report_file: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable colored console output")]
        no_color: bool,
    },
    /// List output formats
    #[command(
        about = "List output formats",
        long_about = "Print the names of all registered output formats."
    )]
    Formats,
}
