//! Key paths: dotted addresses of translatable strings.
//!
//! A key path such as `settings.device.oled.1800` names one leaf across every
//! locale table. The web UI indexes into the tables by exact string match, so
//! segments are kept byte-for-byte: case-sensitive, numeric strings included.

use crate::i18n::TableError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Separator between key path segments.
pub const SEPARATOR: char = '.';

/// A validated, dotted key path (e.g. `auth.login`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath {
    raw: String,
}

impl KeyPath {
    /// Parse a dotted key path.
    ///
    /// # Returns
    /// * `Ok(KeyPath)` if every segment is non-empty
    /// * `Err(TableError::InvalidKeyPath)` for an empty path or an empty segment
    ///   (`auth..login`, `.auth`, `auth.`)
    pub fn parse(text: &str) -> Result<KeyPath, TableError> {
        if text.is_empty() {
            return Err(TableError::InvalidKeyPath {
                path: text.to_string(),
                reason: "key path is empty",
            });
        }

        if text.split(SEPARATOR).any(str::is_empty) {
            return Err(TableError::InvalidKeyPath {
                path: text.to_string(),
                reason: "key path contains an empty segment",
            });
        }

        Ok(KeyPath {
            raw: text.to_string(),
        })
    }

    /// Build a key path from individual segments.
    pub fn from_segments<I, S>(segments: I) -> Result<KeyPath, TableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut raw = String::new();
        for segment in segments {
            let segment = segment.as_ref();
            validate_segment(segment)?;
            if !raw.is_empty() {
                raw.push(SEPARATOR);
            }
            raw.push_str(segment);
        }

        if raw.is_empty() {
            return Err(TableError::InvalidKeyPath {
                path: raw,
                reason: "key path is empty",
            });
        }

        Ok(KeyPath { raw })
    }

    /// Wrap a path whose segments were already checked by the caller.
    pub(crate) fn from_validated(raw: String) -> KeyPath {
        KeyPath { raw }
    }

    /// Extend this path by one segment.
    pub fn child(&self, segment: &str) -> Result<KeyPath, TableError> {
        validate_segment(segment)?;
        Ok(KeyPath {
            raw: format!("{}{}{}", self.raw, SEPARATOR, segment),
        })
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split(SEPARATOR)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Top-level UI section this path belongs to (e.g. `auth`).
    pub fn section(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Check that a single segment can appear in a key path.
pub(crate) fn validate_segment(segment: &str) -> Result<(), TableError> {
    if segment.is_empty() {
        return Err(TableError::InvalidKeyPath {
            path: segment.to_string(),
            reason: "key path contains an empty segment",
        });
    }
    if segment.contains(SEPARATOR) {
        return Err(TableError::InvalidKeyPath {
            path: segment.to_string(),
            reason: "key segment contains the '.' separator",
        });
    }
    Ok(())
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for KeyPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for KeyPath {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        KeyPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}
