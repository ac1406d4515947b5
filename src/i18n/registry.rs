//! Locale registry: display metadata for the locales shipped with the web UI.
//!
//! Every registered locale has a bundled table. Tables loaded from a
//! directory may use codes the registry does not list; those are served
//! under their bare code with no display names.

/// Display metadata for a shipped locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en", "de", "ja")
    pub code: &'static str,

    /// English name of the language (e.g., "German")
    pub name: &'static str,

    /// Native name of the language (e.g., "Deutsch", "日本語")
    pub native_name: &'static str,
}

/// Shipped locales, the default reference first.
const SHIPPED: &[LocaleConfig] = &[
    LocaleConfig {
        code: "en",
        name: "English",
        native_name: "English",
    },
    LocaleConfig {
        code: "de",
        name: "German",
        native_name: "Deutsch",
    },
    LocaleConfig {
        code: "it",
        name: "Italian",
        native_name: "Italiano",
    },
    LocaleConfig {
        code: "ja",
        name: "Japanese",
        native_name: "日本語",
    },
];

/// Read-only table of shipped locales.
pub struct LocaleRegistry {
    locales: &'static [LocaleConfig],
}

static REGISTRY: LocaleRegistry = LocaleRegistry { locales: SHIPPED };

impl LocaleRegistry {
    /// The process-wide registry.
    pub fn get() -> &'static LocaleRegistry {
        &REGISTRY
    }

    /// Metadata for an exact, case-sensitive locale code.
    pub fn get_by_code(&self, code: &str) -> Option<&'static LocaleConfig> {
        let locales: &'static [LocaleConfig] = self.locales;
        locales.iter().find(|locale| locale.code == code)
    }

    /// Every shipped locale, the default reference first.
    pub fn locales(&self) -> &'static [LocaleConfig] {
        self.locales
    }

    /// The locale whose table defines the key-path schema unless
    /// `DEFAULT_LOCALE` picks another one.
    pub fn reference(&self) -> &'static LocaleConfig {
        let locales: &'static [LocaleConfig] = self.locales;
        &locales[0]
    }
}
