//! The catalog: every locale table plus the reference they fall back to.
//!
//! Lookups never fail. A key is answered by the requested locale if it has
//! the string, else by the reference locale, else by the key path itself.

use crate::i18n::locale::{primary_subtag, ranked_tags};
use crate::i18n::{bundled, CatalogError, KeyPath, LocaleRegistry, LocaleTable, LookupMetrics};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    /// The requested locale defines the key.
    Locale,
    /// The reference locale answered instead.
    Fallback,
    /// No table defines the key; the key path itself is returned.
    Key,
}

/// Result of resolving a key for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    /// Display text
    pub text: &'a str,

    /// Code of the table that answered (`None` for `LookupSource::Key`)
    pub locale: Option<&'a str>,

    pub source: LookupSource,
}

/// All loaded locale tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    reference: LocaleTable,
    translations: BTreeMap<String, LocaleTable>,
}

impl Catalog {
    /// Assemble a catalog from tables.
    ///
    /// # Arguments
    /// * `reference` - Code of the reference locale; one of `tables` must have it
    /// * `tables` - All locale tables, the reference included
    ///
    /// # Returns
    /// * `Err(CatalogError::MissingReference)` if no table has the reference code
    pub fn new(
        reference: &str,
        tables: impl IntoIterator<Item = LocaleTable>,
    ) -> Result<Catalog, CatalogError> {
        let mut reference_table = None;
        let mut translations = BTreeMap::new();

        for table in tables {
            if table.code() == reference {
                if reference_table.replace(table).is_some() {
                    warn!(
                        "Duplicate table for reference locale '{}', keeping the last one",
                        reference
                    );
                }
            } else if let Some(previous) = translations.insert(table.code().to_string(), table) {
                warn!("Duplicate table for locale '{}', keeping the last one", previous.code());
            }
        }

        let reference = reference_table
            .ok_or_else(|| CatalogError::MissingReference(reference.to_string()))?;

        Ok(Catalog {
            reference,
            translations,
        })
    }

    /// Build the catalog from the tables compiled into the binary.
    ///
    /// Every registered locale is included. `reference` picks which of them
    /// the others are checked against and fall back to; it must be one of
    /// the bundled codes.
    pub fn bundled(reference: &str) -> Result<Catalog, CatalogError> {
        let mut tables = Vec::new();

        for config in LocaleRegistry::get().locales() {
            let Some(source) = bundled::source(config.code) else {
                warn!("No bundled table for registered locale '{}'", config.code);
                continue;
            };

            let table = LocaleTable::from_json_str(config.code, source).map_err(|source| {
                CatalogError::Bundled {
                    locale: config.code.to_string(),
                    source,
                }
            })?;
            debug!("Loaded bundled locale '{}' ({} strings)", config.code, table.len());
            tables.push(table);
        }

        Self::new(reference, tables)
    }

    /// Load every `<code>.json` file in a directory.
    ///
    /// Files may hold a bare table or an i18next resource
    /// (`{"translation": {...}}`). Files without a `.json` extension are
    /// skipped. The file stem is lowercased to form the locale code, so
    /// `DE.json` loads as `de`.
    pub fn load_dir(dir: &Path, reference: &str) -> Result<Catalog, CatalogError> {
        let read_dir = fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut tables = Vec::new();
        for path in paths {
            let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
            let code = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_ascii_lowercase);

            let (true, Some(code)) = (is_json && path.is_file(), code) else {
                debug!("Skipping non-locale entry {}", path.display());
                continue;
            };

            let text = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            let table = LocaleTable::from_resource_str(&code, &text).map_err(|source| {
                CatalogError::Table {
                    path: path.clone(),
                    source,
                }
            })?;

            info!(
                "Loaded locale '{}' ({} strings) from {}",
                code,
                table.len(),
                path.display()
            );
            tables.push(table);
        }

        Self::new(reference, tables)
    }

    /// The reference table.
    pub fn reference(&self) -> &LocaleTable {
        &self.reference
    }

    pub fn reference_code(&self) -> &str {
        self.reference.code()
    }

    /// Table for an exact locale code.
    pub fn table(&self, code: &str) -> Option<&LocaleTable> {
        if code == self.reference.code() {
            Some(&self.reference)
        } else {
            self.translations.get(code)
        }
    }

    /// All tables sorted by locale code.
    pub fn tables(&self) -> Vec<&LocaleTable> {
        let mut tables: Vec<&LocaleTable> = self.translations.values().collect();
        tables.push(&self.reference);
        tables.sort_by(|a, b| a.code().cmp(b.code()));
        tables
    }

    /// Every table except the reference, sorted by locale code.
    pub fn translations(&self) -> impl Iterator<Item = &LocaleTable> {
        self.translations.values()
    }

    /// All locale codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        self.tables().into_iter().map(LocaleTable::code).collect()
    }

    /// Number of locales, the reference included.
    pub fn len(&self) -> usize {
        self.translations.len() + 1
    }

    /// Always false: a catalog holds at least the reference table.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Map a requested locale tag to a loaded locale code.
    ///
    /// Tries the exact code, then the lowercased tag, then the primary subtag
    /// (`de-DE` -> `de`).
    pub fn resolve_locale(&self, tag: &str) -> Option<&str> {
        let trimmed = tag.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let primary = primary_subtag(trimmed);

        let found = [trimmed, lowered.as_str(), primary.as_str()]
            .into_iter()
            .filter(|candidate| !candidate.is_empty())
            .find_map(|candidate| self.table(candidate).map(LocaleTable::code));
        found
    }

    /// Pick the loaded locale that best matches an `Accept-Language` header.
    ///
    /// Tags are tried by descending `q` weight through `resolve_locale`.
    /// Falls back to the reference locale when nothing matches.
    pub fn negotiate(&self, accept_language: &str) -> &str {
        let found = ranked_tags(accept_language)
            .into_iter()
            .find_map(|tag| self.resolve_locale(tag));
        found.unwrap_or_else(|| self.reference_code())
    }

    /// Resolve a key for a locale, falling back to the reference locale and
    /// then to the key path itself.
    pub fn lookup<'a>(&'a self, locale: &str, key: &'a str) -> Lookup<'a> {
        let metrics = LookupMetrics::global();

        let path = match KeyPath::parse(key) {
            Ok(path) => path,
            Err(e) => {
                debug!("Lookup of malformed key '{}': {}", key, e);
                metrics.record_miss();
                return Lookup {
                    text: key,
                    locale: None,
                    source: LookupSource::Key,
                };
            }
        };

        let requested = self.resolve_locale(locale).and_then(|code| self.table(code));

        if let Some(table) = requested {
            if let Some(text) = table.get(&path) {
                metrics.record_hit();
                return Lookup {
                    text,
                    locale: Some(table.code()),
                    source: LookupSource::Locale,
                };
            }
        }

        if let Some(text) = self.reference.get(&path) {
            debug!(
                "Key '{}' missing for locale '{}', using '{}'",
                key,
                locale,
                self.reference.code()
            );
            metrics.record_fallback();
            return Lookup {
                text,
                locale: Some(self.reference.code()),
                source: LookupSource::Fallback,
            };
        }

        debug!("Key '{}' not defined in any locale", key);
        metrics.record_miss();
        Lookup {
            text: key,
            locale: None,
            source: LookupSource::Key,
        }
    }

    /// Display text for a key in a locale (see `lookup`).
    pub fn translate<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        self.lookup(locale, key).text
    }

    /// The locale's table with every missing key filled from the reference.
    pub fn resolved_table(&self, locale: &str) -> Option<LocaleTable> {
        let code = self.resolve_locale(locale)?;
        let table = self.table(code)?;
        Some(table.merged_with(&self.reference))
    }
}
