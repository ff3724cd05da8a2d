//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (deep-merged over the defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `NEWSLETTER_DEBUG` | `debug` |
//! | `NEWSLETTER_LOG_LEVEL` | `log_level` |
//! | `NEWSLETTER_WEBSITE_URL` | `site.website_url` |
//! | `NEWSLETTER_SITE_DOMAIN` | `site.domain` |
//! | `NEWSLETTER_FROM_NAME` | `site.from_name` |
//! | `NEWSLETTER_CAMPAIGN_SOURCE` | `campaign.source` |
//! | `NEWSLETTER_MAX_POSTS` | `digest.max_posts` |
//! | `NEWSLETTER_DAYS_BACK` | `digest.days_back` |
//! | `NEWSLETTER_INTERVAL` | `digest.interval` |
//! | `NEWSLETTER_FILTER_TAGS` | `digest.filter_tags` (comma-separated) |
//! | `NEWSLETTER_FEATURED_ONLY` | `digest.featured_only` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use newsletter_rs_core::settings_loader;
//!
//! // Load from TOML
//! let settings = settings_loader::from_toml_file("config/newsletter.toml").unwrap();
//!
//! // Load from TOML with environment overrides
//! let settings = settings_loader::from_toml_file_with_env("config/newsletter.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::NewsletterError;
use crate::settings::{Interval, Settings};

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, NewsletterError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| NewsletterError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, NewsletterError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, NewsletterError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, NewsletterError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| NewsletterError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, NewsletterError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, NewsletterError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies process environment overrides to a settings struct.
///
/// See the module documentation for the supported variables.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides read through `lookup`, which maps a variable name to its value.
///
/// Values that fail to parse (a non-numeric `NEWSLETTER_MAX_POSTS`, an unknown
/// interval) are ignored and logged.
pub fn apply_overrides_from<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("NEWSLETTER_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Some(val) = lookup("NEWSLETTER_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("NEWSLETTER_WEBSITE_URL") {
        settings.site.website_url = val.trim_end_matches('/').to_string();
    }

    if let Some(val) = lookup("NEWSLETTER_SITE_DOMAIN") {
        settings.site.domain = Some(val);
    }

    if let Some(val) = lookup("NEWSLETTER_FROM_NAME") {
        settings.site.from_name = val;
    }

    if let Some(val) = lookup("NEWSLETTER_CAMPAIGN_SOURCE") {
        settings.campaign.source = Some(val);
    }

    if let Some(val) = lookup("NEWSLETTER_MAX_POSTS") {
        match val.trim().parse::<usize>() {
            Ok(n) => settings.digest.max_posts = n,
            Err(e) => tracing::warn!("Ignoring NEWSLETTER_MAX_POSTS={val:?}: {e}"),
        }
    }

    if let Some(val) = lookup("NEWSLETTER_DAYS_BACK") {
        match val.trim().parse::<u32>() {
            Ok(n) => settings.digest.days_back = n,
            Err(e) => tracing::warn!("Ignoring NEWSLETTER_DAYS_BACK={val:?}: {e}"),
        }
    }

    if let Some(val) = lookup("NEWSLETTER_INTERVAL") {
        match val.parse::<Interval>() {
            Ok(interval) => settings.digest.interval = interval,
            Err(e) => tracing::warn!("Ignoring NEWSLETTER_INTERVAL: {e}"),
        }
    }

    if let Some(val) = lookup("NEWSLETTER_FILTER_TAGS") {
        settings.digest.filter_tags = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(val) = lookup("NEWSLETTER_FEATURED_ONLY") {
        settings.digest.featured_only = parse_flag(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, NewsletterError> {
    std::fs::read_to_string(path).map_err(|e| {
        NewsletterError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

/// Deep-merges a parsed config document over the serialized defaults.
fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<Settings, NewsletterError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        NewsletterError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        NewsletterError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
