//! Audit binary - checks every locale table against the reference locale
//!
//! Usage:
//!   cargo run --bin audit                        # Audit the bundled tables
//!   cargo run --bin audit -- locales/            # Audit the tables in a directory
//!   cargo run --bin audit -- --json              # Print the report as JSON
//!   cargo run --bin audit -- --strict            # Exit non-zero on any error
//!
//! Optional environment variables:
//! - DEFAULT_LOCALE (reference locale, defaults to en)

use anyhow::{bail, Context, Result};
use mspkvm_i18n::i18n::{Catalog, CatalogReport, ConsistencyValidator, ValidationReport};
use std::path::PathBuf;
use tracing::info;

/// Parsed command line.
struct AuditArgs {
    dir: Option<PathBuf>,
    json: bool,
    strict: bool,
}

impl AuditArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = AuditArgs {
            dir: None,
            json: false,
            strict: false,
        };

        for arg in args {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--strict" => parsed.strict = true,
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                path if parsed.dir.is_none() => parsed.dir = Some(PathBuf::from(path)),
                extra => bail!("Unexpected argument: {}", extra),
            }
        }

        Ok(parsed)
    }
}

/// One-line status summary for a locale.
fn summary_line(locale: &ValidationReport) -> String {
    let status = if locale.has_errors() {
        "FAIL"
    } else if locale.has_warnings() {
        "WARN"
    } else {
        "OK"
    };

    format!(
        "[{}] {} - {:.1}% coverage, {} missing, {} extra, {} empty, \
         {} placeholder mismatches, {} untranslated",
        status,
        locale.locale,
        locale.coverage,
        locale.missing.len(),
        locale.extra.len(),
        locale.empty.len(),
        locale.placeholder_mismatches.len(),
        locale.untranslated.len()
    )
}

fn print_report(report: &CatalogReport) {
    println!("Reference locale: {}", report.reference);
    println!();

    for locale in &report.locales {
        println!("{}", summary_line(locale));

        for message in locale.errors() {
            println!("    error: {}", message);
        }
        for message in locale.warnings() {
            println!("    warning: {}", message);
        }
    }

    println!();
    println!(
        "{} errors, {} warnings",
        report.total_errors(),
        report.total_warnings()
    );
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mspkvm_i18n=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: audit [DIR] [--json] [--strict]");
        return Ok(());
    }
    let args = AuditArgs::parse(&args)?;

    let reference = std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string());

    let catalog = match &args.dir {
        Some(dir) => {
            info!("Auditing locale tables in {}", dir.display());
            Catalog::load_dir(dir, &reference)
                .with_context(|| format!("failed to load locales from {}", dir.display()))?
        }
        None => Catalog::bundled(&reference).with_context(|| {
            format!("failed to load bundled locales with reference '{}'", reference)
        })?,
    };

    let report = ConsistencyValidator::audit(&catalog);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if args.strict && report.has_errors() {
        bail!("{} locale errors found", report.total_errors());
    }

    Ok(())
}
