//! Internationalization (i18n) module for the MSPKVM web interface strings.
//!
//! All locale data handling lives here: loading the per-language tables,
//! resolving key paths with fallback, and checking that every table follows
//! the reference schema.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `locale`: Validated Locale type, tag parsing and `Accept-Language` negotiation
//! - `key_path`: Dotted key paths (`auth.login`) addressing one string in every table
//! - `table`: One language's nested section/string mapping
//! - `bundled`: Tables embedded from `locales/*.json`
//! - `catalog`: All tables plus lookup with fallback to the reference locale
//! - `validator`: Missing/extra/empty/untranslated key detection
//! - `metrics`: Lookup observability
//!
//! # Example
//!
//! ```rust,ignore
//! use mspkvm_i18n::i18n::{Catalog, ConsistencyValidator};
//!
//! let catalog = Catalog::bundled("en")?;
//! assert_eq!(catalog.translate("de", "auth.login"), "Einloggen");
//!
//! let report = ConsistencyValidator::audit(&catalog);
//! for locale in &report.locales {
//!     println!("{}: {:.1}% coverage", locale.locale, locale.coverage);
//! }
//! ```

pub mod bundled;
mod catalog;
mod error;
mod key_path;
mod locale;
mod metrics;
mod registry;
mod table;
mod validator;

pub use catalog::{Catalog, Lookup, LookupSource};
pub use error::{CatalogError, TableError};
pub use key_path::KeyPath;
pub use locale::Locale;
pub use metrics::{LookupMetrics, MetricsReport};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use table::{Entry, LocaleTable, NAMESPACE};
pub use validator::{CatalogReport, ConsistencyValidator, ValidationReport};
