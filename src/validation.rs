//! Argument validation for values arriving from the transport layer.
//!
//! Session ids become blob keys (`history/<id>.json`), so they are held to the
//! same path-safe alphabet as any other on-disk identifier.

use crate::error::{Result, SidekickError};

/// Maximum allowed length for session ids.
pub const MAX_ID_LENGTH: usize = 128;

pub const MAX_CONTEXT_LINES: usize = 10;
pub const MAX_SEARCH_RESULTS: usize = 100;
pub const MAX_RETENTION_DAYS: u32 = 365;

/// Reserved names that cannot be used as IDs (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that a session id is safe for use in blob keys.
///
/// # Examples
///
/// ```
/// use sidekick::validation::validate_id;
///
/// assert!(validate_id("ssh-prod-01").is_ok());
/// assert!(validate_id("6f1c2a9e-2b7d-4c1e-9f0a-3d5b8e7c6a41").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("web01.prod").is_ok());
/// assert!(validate_id("../etc/passwd").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(SidekickError::invalid("ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(SidekickError::invalid(format!(
            "ID too long: {} characters (max {MAX_ID_LENGTH})",
            id.len()
        )));
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid_chars {
        return Err(SidekickError::invalid(format!(
            "ID '{id}' contains invalid characters. Use only alphanumeric characters, \
             dashes (-), underscores (_), and dots (.)"
        )));
    }

    let id_lower = id.to_lowercase();
    if RESERVED_NAMES.contains(&id_lower.as_str()) {
        return Err(SidekickError::invalid(format!("ID '{id}' uses a reserved name")));
    }

    Ok(())
}

pub fn validate_confidence(confidence: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(SidekickError::invalid(format!(
            "Confidence must be between 0.0 and 1.0, got {confidence}"
        )));
    }
    Ok(())
}

pub fn validate_retention_days(days: u32) -> Result<()> {
    if !(1..=MAX_RETENTION_DAYS).contains(&days) {
        return Err(SidekickError::invalid(format!(
            "retention_days must be between 1 and {MAX_RETENTION_DAYS}, got {days}"
        )));
    }
    Ok(())
}

pub fn validate_context_lines(lines: usize) -> Result<()> {
    if lines > MAX_CONTEXT_LINES {
        return Err(SidekickError::invalid(format!(
            "context_lines must be between 0 and {MAX_CONTEXT_LINES}, got {lines}"
        )));
    }
    Ok(())
}

pub fn validate_max_results(max: usize) -> Result<()> {
    if !(1..=MAX_SEARCH_RESULTS).contains(&max) {
        return Err(SidekickError::invalid(format!(
            "max_results must be between 1 and {MAX_SEARCH_RESULTS}, got {max}"
        )));
    }
    Ok(())
}

pub fn validate_min_occurrences(min: u64) -> Result<()> {
    if min < 1 {
        return Err(SidekickError::invalid("min_occurrences must be at least 1"));
    }
    Ok(())
}

/// Comma-separated display form of an enum's values, for error messages.
pub fn list_values<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Clap value parser for validating ID arguments.
pub fn clap_id_validator(s: &str) -> std::result::Result<String, String> {
    validate_id(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for confidence thresholds.
pub fn clap_confidence_validator(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    validate_confidence(value).map_err(|e| e.to_string())?;
    Ok(value)
}
