//! Shiftlog CLI binary entry point.
//! Resolves configuration, loads the run result, and renders it.

use anyhow::{Context, Result};
use clap::Parser;
use shiftlog::cli::{Cli, Commands};
use shiftlog::{config, ChangelogResolver, DocIndex, Formatter, FormatterRegistry, ReportError};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, info};

/// Exit code for configuration errors (unknown format, bad documentation index).
const EXIT_CONFIG: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);
    match run(cli) {
        Ok(()) => {}
        Err(err) => {
            let code = if is_configuration(&err) { EXIT_CONFIG } else { 1 };
            eprintln!("error: {err:#}");
            std::process::exit(code);
        }
    }
}

fn is_configuration(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<ReportError>()
            .is_some_and(ReportError::is_configuration)
    })
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Formats => {
            let resolver = Arc::new(ChangelogResolver::new(DocIndex::default()));
            for name in FormatterRegistry::with_defaults(resolver, false).names() {
                println!("{name}");
            }
        }
        Commands::Render {
            repo_root,
            input,
            output,
            docs,
            report_file,
            no_color,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                docs.as_deref(),
                report_file.as_deref(),
                no_color,
            )?;
            if !eff.config_found {
                debug!("no shiftlog.toml found; using defaults");
            }
            let index = match eff.docs.as_deref() {
                Some(path) => config::load_doc_index(path)?,
                None => DocIndex::default(),
            };
            let resolver = Arc::new(ChangelogResolver::new(index));
            // Terminal output gets colors; files never do.
            let colors = eff.color && eff.report_file.is_none();
            let registry = FormatterRegistry::with_defaults(resolver, colors);
            // Reject an unknown format before touching the input.
            let formatter = registry.get(&eff.output)?;

            let input = input.as_deref().unwrap_or("-");
            let result = config::load_result(input)?;
            info!(
                format = formatter.name(),
                files = result.file_diffs().len(),
                errors = result.errors().len(),
                "rendering report"
            );

            match eff.report_file.as_deref() {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)
                            .with_context(|| format!("create {}", parent.display()))?;
                    }
                    let mut file = fs::File::create(path)
                        .with_context(|| format!("create {}", path.display()))?;
                    formatter.render(&result, &mut file)?;
                    info!(path = %path.display(), "report written");
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    formatter.render(&result, &mut lock)?;
                    lock.flush()?;
                }
            }
        }
    }
    Ok(())
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}
