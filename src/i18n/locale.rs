//! Locale type: validated locale representation.
//!
//! A `Locale` can only be constructed for a code the registry knows, so
//! holders never need to re-check it. Tables loaded from a directory may use
//! codes outside the registry; those are plain strings handled by `Catalog`.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};

/// A validated locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO 639-1 language code (e.g., "en", "de")
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const GERMAN: Locale = Locale { code: "de" };
    pub const ITALIAN: Locale = Locale { code: "it" };
    pub const JAPANESE: Locale = Locale { code: "ja" };

    /// Create a Locale from an exact language code.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered
    /// * `Err` if the code is not found
    pub fn from_code(code: &str) -> Result<Locale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) => Ok(Locale { code: config.code }),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// Create a Locale from a language tag such as `de-DE`, `ja_JP` or `IT`.
    ///
    /// Only the primary subtag is significant and it is matched
    /// case-insensitively.
    pub fn from_tag(tag: &str) -> Result<Locale> {
        let primary = primary_subtag(tag);
        if primary.is_empty() {
            bail!("Empty language tag");
        }
        Self::from_code(&primary)
    }

    /// Pick the best registered locale for an `Accept-Language` header.
    ///
    /// Falls back to the reference locale when nothing matches. To negotiate
    /// against the tables actually loaded, use `Catalog::negotiate`.
    pub fn negotiate(accept_language: &str) -> Locale {
        ranked_tags(accept_language)
            .into_iter()
            .find_map(|tag| Locale::from_tag(tag).ok())
            .unwrap_or_else(Locale::reference)
    }

    /// Get the default reference locale (the schema every table follows).
    pub fn reference() -> Locale {
        let config = LocaleRegistry::get().reference();
        Locale { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not found in the registry. This cannot happen for
    /// a Locale built through `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    /// English name of the language (e.g., "German").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Native name of the language (e.g., "Deutsch").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Whether this is the registry's default reference locale.
    pub fn is_reference(&self) -> bool {
        *self == Locale::reference()
    }
}

/// Lowercased primary subtag of a language tag (`de-DE` -> `de`).
pub(crate) fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Tags of an `Accept-Language` header, best first.
///
/// Ranked by `q` weight (ties keep header order); `q=0` entries and
/// wildcards are dropped.
pub(crate) fn ranked_tags(accept_language: &str) -> Vec<&str> {
    let mut candidates: Vec<(&str, f32)> = accept_language
        .split(',')
        .filter_map(parse_weighted_tag)
        .filter(|(tag, q)| *tag != "*" && *q > 0.0)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.into_iter().map(|(tag, _)| tag).collect()
}

/// Split `de;q=0.8` into its tag and weight. Malformed weights drop the entry.
fn parse_weighted_tag(part: &str) -> Option<(&str, f32)> {
    let mut pieces = part.split(';');
    let tag = pieces.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut q = 1.0;
    for param in pieces {
        if let Some(value) = param.trim().strip_prefix("q=") {
            q = value.trim().parse().ok()?;
        }
    }

    Some((tag, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_constants() {
        assert_eq!(Locale::ENGLISH.code(), "en");
        assert_eq!(Locale::GERMAN.name(), "German");
        assert_eq!(Locale::ITALIAN.native_name(), "Italiano");
        assert_eq!(Locale::JAPANESE.native_name(), "日本語");
    }

    #[test]
    fn test_reference_is_english() {
        let reference = Locale::reference();
        assert_eq!(reference, Locale::ENGLISH);
        assert!(reference.is_reference());
        assert!(!Locale::GERMAN.is_reference());
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_known() {
        let locale = Locale::from_code("ja").expect("Should succeed");
        assert_eq!(locale, Locale::JAPANESE);
    }

    #[test]
    fn test_from_code_unknown() {
        let result = Locale::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Locale::from_code("").is_err());
    }

    #[test]
    fn test_from_code_is_exact() {
        assert!(Locale::from_code("de-DE").is_err());
    }

    // ==================== from_tag Tests ====================

    #[test]
    fn test_from_tag_region() {
        assert_eq!(Locale::from_tag("de-DE").unwrap(), Locale::GERMAN);
        assert_eq!(Locale::from_tag("ja_JP").unwrap(), Locale::JAPANESE);
    }

    #[test]
    fn test_from_tag_case_insensitive() {
        assert_eq!(Locale::from_tag("IT").unwrap(), Locale::ITALIAN);
        assert_eq!(Locale::from_tag(" en-us ").unwrap(), Locale::ENGLISH);
    }

    #[test]
    fn test_from_tag_empty() {
        assert!(Locale::from_tag("").is_err());
        assert!(Locale::from_tag("-DE").is_err());
    }

    // ==================== negotiate Tests ====================

    #[test]
    fn test_negotiate_first_match() {
        assert_eq!(Locale::negotiate("de-DE,de;q=0.9,en;q=0.8"), Locale::GERMAN);
    }

    #[test]
    fn test_negotiate_respects_weights() {
        assert_eq!(Locale::negotiate("en;q=0.5, ja;q=0.9"), Locale::JAPANESE);
    }

    #[test]
    fn test_negotiate_skips_unsupported() {
        assert_eq!(Locale::negotiate("fr-FR,fr;q=0.9,it;q=0.8"), Locale::ITALIAN);
    }

    #[test]
    fn test_negotiate_ignores_zero_weight() {
        assert_eq!(Locale::negotiate("de;q=0,it;q=0.1"), Locale::ITALIAN);
    }

    #[test]
    fn test_negotiate_falls_back_to_reference() {
        assert_eq!(Locale::negotiate("fr,es;q=0.5"), Locale::ENGLISH);
        assert_eq!(Locale::negotiate(""), Locale::ENGLISH);
        assert_eq!(Locale::negotiate("*"), Locale::ENGLISH);
    }

    #[test]
    fn test_negotiate_drops_malformed_weight() {
        assert_eq!(Locale::negotiate("de;q=abc,ja;q=0.2"), Locale::JAPANESE);
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_ranked_tags() {
        assert_eq!(
            ranked_tags("fr;q=0.5, de-AT, *;q=0.9, it;q=0.7, en;q=0"),
            vec!["de-AT", "it", "fr"]
        );
        assert!(ranked_tags("").is_empty());
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(primary_subtag("zh-Hant-TW"), "zh");
        assert_eq!(primary_subtag("JA_jp"), "ja");
    }
}
