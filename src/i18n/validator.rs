//! Locale table consistency validation.
//!
//! Every table is checked against the reference table: the web UI indexes
//! into the tables by exact key path, so a missing key silently falls back to
//! English and an extra key is schema drift nobody reads.

use crate::i18n::{Catalog, KeyPath, LocaleTable};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Consistency report for one locale table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Locale the report is about
    pub locale: String,

    /// Locale it was checked against
    pub reference: String,

    /// Share of reference key paths this locale defines, as a percentage (0-100)
    pub coverage: f64,

    /// Reference key paths the locale lacks
    pub missing: Vec<KeyPath>,

    /// Key paths the reference does not define
    pub extra: Vec<KeyPath>,

    /// Leaves whose value is empty or whitespace
    pub empty: Vec<KeyPath>,

    /// Leaves whose `{{placeholders}}` differ from the reference value
    pub placeholder_mismatches: Vec<KeyPath>,

    /// Multi-word leaves identical to the reference value
    pub untranslated: Vec<KeyPath>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new(locale: &str, reference: &str) -> Self {
        Self {
            locale: locale.to_string(),
            reference: reference.to_string(),
            coverage: 100.0,
            missing: Vec::new(),
            extra: Vec::new(),
            empty: Vec::new(),
            placeholder_mismatches: Vec::new(),
            untranslated: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.missing.is_empty()
            || !self.extra.is_empty()
            || !self.empty.is_empty()
            || !self.placeholder_mismatches.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.untranslated.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Human-readable error messages, one per offending key path.
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for path in &self.missing {
            errors.push(format!(
                "{}: missing key '{}' (defined in {})",
                self.locale, path, self.reference
            ));
        }
        for path in &self.extra {
            errors.push(format!(
                "{}: key '{}' is not defined in {}",
                self.locale, path, self.reference
            ));
        }
        for path in &self.empty {
            errors.push(format!("{}: key '{}' has an empty value", self.locale, path));
        }
        for path in &self.placeholder_mismatches {
            errors.push(format!(
                "{}: placeholders of '{}' differ from {}",
                self.locale, path, self.reference
            ));
        }

        errors
    }

    /// Human-readable warning messages.
    pub fn warnings(&self) -> Vec<String> {
        self.untranslated
            .iter()
            .map(|path| {
                format!(
                    "{}: key '{}' is identical to {} (untranslated?)",
                    self.locale, path, self.reference
                )
            })
            .collect()
    }
}

/// Consistency report for a whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    /// Reference locale code
    pub reference: String,

    /// When the audit ran
    pub generated_at: DateTime<Utc>,

    /// One report per locale (the reference included), sorted by code
    pub locales: Vec<ValidationReport>,
}

impl CatalogReport {
    pub fn has_errors(&self) -> bool {
        self.locales.iter().any(ValidationReport::has_errors)
    }

    pub fn has_warnings(&self) -> bool {
        self.locales.iter().any(ValidationReport::has_warnings)
    }

    /// Total number of error messages across all locales.
    pub fn total_errors(&self) -> usize {
        self.locales.iter().map(|r| r.errors().len()).sum()
    }

    /// Total number of warning messages across all locales.
    pub fn total_warnings(&self) -> usize {
        self.locales.iter().map(|r| r.warnings().len()).sum()
    }

    /// The report for one locale.
    pub fn report_for(&self, code: &str) -> Option<&ValidationReport> {
        self.locales.iter().find(|r| r.locale == code)
    }
}

/// Validator for locale table consistency.
pub struct ConsistencyValidator;

// i18next interpolation: {{name}} or {{name, format}}
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl ConsistencyValidator {
    /// Validate a locale table against the reference table.
    ///
    /// This function checks that:
    /// - every reference key path exists in the table
    /// - the table has no key path the reference lacks
    /// - no value is empty
    /// - interpolation placeholders match the reference value
    ///
    /// and warns about multi-word values copied verbatim from the reference.
    pub fn validate(reference: &LocaleTable, table: &LocaleTable) -> ValidationReport {
        let mut report = ValidationReport::new(table.code(), reference.code());

        let reference_paths = reference.key_paths();
        let table_paths = table.key_paths();

        report.missing = reference_paths.difference(&table_paths).cloned().collect();
        report.extra = table_paths.difference(&reference_paths).cloned().collect();

        for (path, text) in table.entries() {
            if text.trim().is_empty() {
                report.empty.push(path);
                continue;
            }

            let Some(reference_text) = reference.get(&path) else {
                continue;
            };

            if Self::extract_placeholders(text) != Self::extract_placeholders(reference_text) {
                report.placeholder_mismatches.push(path.clone());
            }

            if table.code() != reference.code() && Self::is_untranslated(reference_text, text) {
                report.untranslated.push(path);
            }
        }

        report.coverage = coverage(reference_paths.len(), report.missing.len());
        report
    }

    /// Validate every table of a catalog, the reference included.
    pub fn audit(catalog: &Catalog) -> CatalogReport {
        let reference = catalog.reference();

        let locales = catalog
            .tables()
            .into_iter()
            .map(|table| Self::validate(reference, table))
            .collect();

        CatalogReport {
            reference: reference.code().to_string(),
            generated_at: Utc::now(),
            locales,
        }
    }

    /// Extract the names of all `{{placeholder}}` interpolations in a value.
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{\{\s*([^{}\s,]+)\s*(?:,[^{}]*)?\}\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// A value counts as untranslated when it is a multi-word phrase identical
    /// to the reference. Single tokens (`Wi-Fi`, `FPS`, `IP`) are shared
    /// across languages.
    fn is_untranslated(reference_text: &str, text: &str) -> bool {
        text == reference_text && text.split_whitespace().nth(1).is_some()
    }
}

fn coverage(total: usize, missing: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((total - missing) as f64 / total as f64) * 100.0
}
