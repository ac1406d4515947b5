use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Locale data
    pub locales_dir: Option<PathBuf>,
    pub default_locale: String,

    // HTTP server
    pub host: String,
    pub port: u16,

    // Startup audit
    pub strict_audit: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Locale data - bundled tables unless a directory is given
            locales_dir: std::env::var("LOCALES_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),

            // HTTP server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(v) => v.parse().with_context(|| format!("PORT is not a valid port: {}", v))?,
                Err(_) => 8080,
            },

            // Startup audit
            strict_audit: std::env::var("STRICT_AUDIT")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
