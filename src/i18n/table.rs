//! Locale tables: one language's nested mapping of UI sections to strings.
//!
//! Tables are stored on disk as plain JSON objects (`locales/<code>.json`):
//! objects are sections, strings are leaves. The web UI consumes them as
//! i18next resources, i.e. wrapped in a `translation` namespace.

use crate::i18n::key_path::{validate_segment, KeyPath};
use crate::i18n::TableError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// i18next namespace the web UI loads its strings from.
pub const NAMESPACE: &str = "translation";

/// A node of a locale table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// A translatable string.
    Text(String),
    /// A nested section of further entries.
    Section(BTreeMap<String, Entry>),
}

/// All strings for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    /// Language identifier (e.g., "en", "de", "ja")
    code: String,

    /// Top-level UI sections (e.g., "auth", "screen", "settings")
    root: BTreeMap<String, Entry>,
}

impl LocaleTable {
    /// Create an empty table for a language.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            root: BTreeMap::new(),
        }
    }

    /// Parse a table from a bare JSON object.
    ///
    /// # Arguments
    /// * `code` - The language identifier the table belongs to
    /// * `text` - JSON text whose root is an object of sections
    ///
    /// # Returns
    /// * `Ok(LocaleTable)` if every leaf is a string and every key is a valid segment
    /// * `Err(TableError)` naming the offending key path otherwise
    pub fn from_json_str(code: &str, text: &str) -> Result<LocaleTable, TableError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(code, value)
    }

    /// Parse a table that may be wrapped in the i18next `translation` namespace.
    pub fn from_resource_str(code: &str, text: &str) -> Result<LocaleTable, TableError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(mut map)
                if map.len() == 1 && matches!(map.get(NAMESPACE), Some(Value::Object(_))) =>
            {
                let inner = map.remove(NAMESPACE).unwrap_or(Value::Null);
                Self::from_value(code, inner)
            }
            other => Self::from_value(code, other),
        }
    }

    /// Build a table from an already-parsed JSON value.
    pub fn from_value(code: &str, value: Value) -> Result<LocaleTable, TableError> {
        match value {
            Value::Object(map) => Ok(LocaleTable {
                code: code.to_string(),
                root: convert_section(code, None, map)?,
            }),
            _ => Err(TableError::NotAnObject {
                locale: code.to_string(),
            }),
        }
    }

    /// Language identifier of this table.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Top-level sections of the table.
    pub fn root(&self) -> &BTreeMap<String, Entry> {
        &self.root
    }

    /// Names of the top-level UI sections.
    pub fn sections(&self) -> Vec<&str> {
        self.root.keys().map(String::as_str).collect()
    }

    /// Look up the string at a key path.
    ///
    /// Returns `None` when the path does not exist or addresses a section.
    pub fn get(&self, path: &KeyPath) -> Option<&str> {
        match self.entry(path)? {
            Entry::Text(text) => Some(text.as_str()),
            Entry::Section(_) => None,
        }
    }

    /// Look up the node (leaf or section) at a key path.
    pub fn entry(&self, path: &KeyPath) -> Option<&Entry> {
        let mut segments = path.segments();
        let mut current = self.root.get(segments.next()?)?;

        for segment in segments {
            match current {
                Entry::Section(children) => current = children.get(segment)?,
                Entry::Text(_) => return None,
            }
        }

        Some(current)
    }

    /// Whether a leaf string exists at the path.
    pub fn contains(&self, path: &KeyPath) -> bool {
        self.get(path).is_some()
    }

    /// Set the string at a key path, creating intermediate sections.
    ///
    /// # Returns
    /// * `Ok(Some(previous))` when an existing leaf was replaced
    /// * `Ok(None)` when the leaf is new
    /// * `Err(TableError::PathConflict)` when a prefix of the path is a leaf, or
    ///   the path itself names a section
    pub fn insert(
        &mut self,
        path: &KeyPath,
        value: impl Into<String>,
    ) -> Result<Option<String>, TableError> {
        let segments: Vec<&str> = path.segments().collect();
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| TableError::InvalidKeyPath {
                path: path.to_string(),
                reason: "key path is empty",
            })?;

        let mut section = &mut self.root;
        for segment in parents {
            let next = section
                .entry((*segment).to_string())
                .or_insert_with(|| Entry::Section(BTreeMap::new()));
            section = match next {
                Entry::Section(children) => children,
                Entry::Text(_) => {
                    return Err(TableError::PathConflict {
                        path: path.to_string(),
                        existing: "string",
                    })
                }
            };
        }

        if let Some(Entry::Section(_)) = section.get(*last) {
            return Err(TableError::PathConflict {
                path: path.to_string(),
                existing: "section",
            });
        }

        let previous = section.insert((*last).to_string(), Entry::Text(value.into()));
        Ok(match previous {
            Some(Entry::Text(text)) => Some(text),
            _ => None,
        })
    }

    /// All leaves in key order.
    pub fn entries(&self) -> Vec<(KeyPath, &str)> {
        let mut out = Vec::new();
        collect_leaves(&self.root, "", &mut out);
        out
    }

    /// The set of leaf key paths.
    pub fn key_paths(&self) -> BTreeSet<KeyPath> {
        self.entries().into_iter().map(|(path, _)| path).collect()
    }

    /// Number of leaf strings.
    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of this table with every path it lacks filled in from `reference`.
    pub fn merged_with(&self, reference: &LocaleTable) -> LocaleTable {
        let mut merged = self.clone();

        for (path, text) in reference.entries() {
            if merged.entry(&path).is_some() {
                continue;
            }
            if let Err(e) = merged.insert(&path, text) {
                debug!("Not filling '{}' for locale '{}': {}", path, self.code, e);
            }
        }

        merged
    }

    /// The table as a bare JSON object.
    pub fn to_value(&self) -> Value {
        section_to_value(&self.root)
    }

    /// The table as an i18next resource (`{"translation": {...}}`).
    pub fn to_resource(&self) -> Value {
        json!({ NAMESPACE: self.to_value() })
    }

    /// Pretty-printed JSON, in the same shape `from_json_str` reads.
    pub fn to_json_string(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

fn convert_section(
    code: &str,
    parent: Option<&KeyPath>,
    map: Map<String, Value>,
) -> Result<BTreeMap<String, Entry>, TableError> {
    let mut section = BTreeMap::new();

    for (key, value) in map {
        validate_segment(&key).map_err(|_| TableError::InvalidKeyPath {
            path: join(parent.map(KeyPath::as_str), &key),
            reason: "key must be non-empty and must not contain '.'",
        })?;
        let path = KeyPath::from_validated(join(parent.map(KeyPath::as_str), &key));

        let entry = match value {
            Value::String(text) => Entry::Text(text),
            Value::Object(children) => Entry::Section(convert_section(code, Some(&path), children)?),
            other => {
                return Err(TableError::NonStringValue {
                    locale: code.to_string(),
                    path: path.to_string(),
                    found: json_kind(&other),
                })
            }
        };

        section.insert(key, entry);
    }

    Ok(section)
}

fn collect_leaves<'a>(
    section: &'a BTreeMap<String, Entry>,
    prefix: &str,
    out: &mut Vec<(KeyPath, &'a str)>,
) {
    for (key, entry) in section {
        let path = join(Some(prefix).filter(|p| !p.is_empty()), key);
        match entry {
            Entry::Text(text) => out.push((KeyPath::from_validated(path), text.as_str())),
            Entry::Section(children) => collect_leaves(children, &path, out),
        }
    }
}

fn count_leaves(section: &BTreeMap<String, Entry>) -> usize {
    section
        .values()
        .map(|entry| match entry {
            Entry::Text(_) => 1,
            Entry::Section(children) => count_leaves(children),
        })
        .sum()
}

fn section_to_value(section: &BTreeMap<String, Entry>) -> Value {
    let map = section
        .iter()
        .map(|(key, entry)| {
            let value = match entry {
                Entry::Text(text) => Value::String(text.clone()),
                Entry::Section(children) => section_to_value(children),
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(map)
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, key),
        None => key.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
