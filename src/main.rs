use anyhow::{bail, Context, Result};
use mspkvm_i18n::config::Config;
use mspkvm_i18n::i18n::{Catalog, ConsistencyValidator};
use mspkvm_i18n::server;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mspkvm_i18n=info".parse()?),
        )
        .init();

    info!("Starting MSPKVM locale service");

    let config = Config::from_env()?;

    // Step 1: Load locale tables
    let catalog = match &config.locales_dir {
        Some(dir) => {
            info!("Loading locale tables from {}", dir.display());
            Catalog::load_dir(dir, &config.default_locale)
                .with_context(|| format!("failed to load locales from {}", dir.display()))?
        }
        None => {
            info!(
                "Using bundled locale tables, reference '{}'",
                config.default_locale
            );
            Catalog::bundled(&config.default_locale).with_context(|| {
                format!(
                    "failed to load bundled locales with reference '{}'",
                    config.default_locale
                )
            })?
        }
    };

    info!(
        "Loaded {} locales ({}), reference '{}' with {} strings",
        catalog.len(),
        catalog.codes().join(", "),
        catalog.reference_code(),
        catalog.reference().len()
    );

    // Step 2: Audit tables against the reference
    let report = ConsistencyValidator::audit(&catalog);
    for locale in &report.locales {
        for message in locale.errors() {
            warn!("{}", message);
        }
        if locale.has_warnings() {
            info!(
                "{}: {} possibly untranslated strings",
                locale.locale,
                locale.untranslated.len()
            );
        }
    }

    if report.has_errors() && config.strict_audit {
        bail!(
            "locale audit found {} errors and STRICT_AUDIT is set",
            report.total_errors()
        );
    }

    // Step 3: Serve
    server::serve(&config, Arc::new(catalog)).await
}
