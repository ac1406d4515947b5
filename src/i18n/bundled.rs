//! Locale tables embedded into the binary at compile time.
//!
//! The JSON files under `locales/` are the authored source of truth; they are
//! compiled in so the service and the audit tool work without a data
//! directory.

/// English strings (reference).
const EN: &str = include_str!("../../locales/en.json");

/// German strings.
const DE: &str = include_str!("../../locales/de.json");

/// Italian strings.
const IT: &str = include_str!("../../locales/it.json");

/// Japanese strings.
const JA: &str = include_str!("../../locales/ja.json");

/// Embedded JSON source for a locale code, if one is bundled.
pub fn source(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some(EN),
        "de" => Some(DE),
        "it" => Some(IT),
        "ja" => Some(JA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleRegistry;

    #[test]
    fn test_every_registered_locale_is_bundled() {
        for config in LocaleRegistry::get().locales() {
            assert!(
                source(config.code).is_some(),
                "No bundled table for '{}'",
                config.code
            );
        }
    }

    #[test]
    fn test_unknown_locale_not_bundled() {
        assert!(source("fr").is_none());
        assert!(source("EN").is_none());
    }

    #[test]
    fn test_sources_are_json_objects() {
        for code in ["en", "de", "it", "ja"] {
            let text = source(code).unwrap();
            assert!(text.trim_start().starts_with('{'));
        }
    }
}
