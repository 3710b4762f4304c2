//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user file placed in the content root:
//!
//! ```text
//! content/
//! ├── config.toml      # optional, overrides stock defaults
//! ├── tr/
//! └── en/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_locale = "tr"        # Locale that missing pages fall back to
//! locales = ["tr", "en"]       # Locales checked by `sofra check`
//! environment = "development"  # or "production"; SOFRA_ENV overrides
//!
//! [cache]
//! policy = "non-production"    # non-production | production-only | always | never
//!
//! [dates]
//! time_zone = "Europe/Istanbul"
//!
//! [management]
//! order = []                   # Slugs listed first on the management page
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::date::DEFAULT_TIME_ZONE;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides the configured runtime environment.
pub const ENVIRONMENT_VAR: &str = "SOFRA_ENV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Locale whose content is served when a page is missing elsewhere.
    pub default_locale: String,
    /// Every locale directory the site publishes.
    pub locales: Vec<String>,
    /// Runtime environment, consulted by the cache policy.
    pub environment: Environment,
    pub cache: CacheConfig,
    pub dates: DatesConfig,
    pub management: ManagementConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_locale: "tr".to_string(),
            locales: vec!["tr".to_string(), "en".to_string()],
            environment: Environment::Development,
            cache: CacheConfig::default(),
            dates: DatesConfig::default(),
            management: ManagementConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locales.is_empty() {
            return Err(ConfigError::Validation("locales must not be empty".into()));
        }
        if let Some(bad) = self.locales.iter().find(|l| !is_valid_locale(l)) {
            return Err(ConfigError::Validation(format!(
                "locale '{bad}' must be a plain directory name"
            )));
        }
        if !self.locales.contains(&self.default_locale) {
            return Err(ConfigError::Validation(format!(
                "default_locale '{}' must be one of locales",
                self.default_locale
            )));
        }
        if self.dates.time_zone.parse::<Tz>().is_err() {
            return Err(ConfigError::Validation(format!(
                "dates.time_zone '{}' is not an IANA time zone",
                self.dates.time_zone
            )));
        }
        Ok(())
    }

    /// Display zone for dates. Falls back to Istanbul if unparsable, which
    /// `validate` rules out for loaded configs.
    pub fn time_zone(&self) -> Tz {
        self.dates.time_zone.parse().unwrap_or(DEFAULT_TIME_ZONE)
    }

    /// The configured environment, unless `SOFRA_ENV` says otherwise.
    pub fn effective_environment(&self) -> Environment {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .and_then(|v| Environment::parse(&v))
            .unwrap_or(self.environment)
    }
}

fn is_valid_locale(locale: &str) -> bool {
    !locale.is_empty()
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Runtime environment of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name as found in `SOFRA_ENV`.
    ///
    /// `production`/`prod` select production; `development`/`dev`/`test`
    /// select development. Anything else is not recognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" | "test" => Some(Environment::Development),
            _ => None,
        }
    }
}

/// When the loader consults its cache.
///
/// `non-production` caches only outside production, so production always
/// reads fresh from disk. `production-only` is the inverse. The choice is
/// explicit because both are reasonable for a file-backed site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    #[default]
    NonProduction,
    ProductionOnly,
    Always,
    Never,
}

impl CachePolicy {
    pub fn is_active(self, environment: Environment) -> bool {
        match self {
            CachePolicy::NonProduction => environment != Environment::Production,
            CachePolicy::ProductionOnly => environment == Environment::Production,
            CachePolicy::Always => true,
            CachePolicy::Never => false,
        }
    }
}

/// Loader cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub policy: CachePolicy,
}

/// Date display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatesConfig {
    /// IANA zone dates are displayed in, regardless of reader locale.
    pub time_zone: String,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.name().to_string(),
        }
    }
}

/// Management listing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagementConfig {
    /// Slugs shown first, in this order. Everyone else follows
    /// alphabetically.
    pub order: Vec<String>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// File name of the site config, looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

/// Stock defaults as a TOML table, the layer user values are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value, arrays included,
/// replaces the base value. Base keys missing from the overlay survive, which
/// is what keeps a sparse `[cache]` table from dropping the other sections.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Build a validated config from the user's values, if any, over the stock
/// defaults.
pub fn resolve_config(user: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let merged = match user {
        Some(user) => merge_toml(stock_defaults_value(), user),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the content root. A missing file means stock
/// defaults; unreadable or invalid files are errors.
pub fn load_config(content_root: &Path) -> Result<SiteConfig, ConfigError> {
    let user = match fs::read_to_string(content_root.join(CONFIG_FILE)) {
        Ok(text) => Some(toml::from_str::<toml::Value>(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    resolve_config(user)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sofra Content Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the content root, next to the locale directories:
#   content/config.toml
#   content/tr/...
#   content/en/...
#
# Unknown keys will cause an error.

# Locale whose content is served when a page is missing in another locale.
# Fallback pages keep their original locale so callers can mark them noindex.
default_locale = "tr"

# Every locale directory the site publishes. `sofra check` validates all of them.
locales = ["tr", "en"]

# Runtime environment: "development" or "production".
# The SOFRA_ENV environment variable overrides this value.
environment = "development"

# ---------------------------------------------------------------------------
# Document cache
# ---------------------------------------------------------------------------
[cache]
# When parsed documents are kept in memory for the life of the process:
#   "non-production"  - cache outside production, always re-read in production
#   "production-only" - cache in production, always re-read elsewhere
#   "always" / "never"
policy = "non-production"

# ---------------------------------------------------------------------------
# Dates
# ---------------------------------------------------------------------------
[dates]
# IANA time zone dates are displayed in, whatever the reader's locale.
time_zone = "Europe/Istanbul"

# ---------------------------------------------------------------------------
# Management listing
# ---------------------------------------------------------------------------
[management]
# Slugs listed first, in this order. Everyone else follows alphabetically.
order = []
"##
}
