//! Password and destructive-operation classification.
//!
//! Both pattern sets are kept as literal tables so they can be audited and
//! extended without touching the matching code. All matching is
//! case-insensitive.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::models::REDACTED;

/// Prompts that ask for a secret.
pub const PASSWORD_PATTERNS: &[&str] = &[
    r"password\s*:",
    r"passphrase\s*:",
    r"pass\s*:",
    r"enter\s+password",
    r"authentication\s+required",
];

/// Destructive shell, SQL and natural-language operations.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    r"\brm\s+-rf\s+/",
    r"\bmkfs\b",
    r"\bdd\s+if=",
    r":[(][)]\{.*?[:][|&].*?\};:",
    r"\bformat\s+[A-Z]:",
    r"\bdel\s+/[fqs]",
    r"\bdelete\b.*?\btable",
    r"\bdelete\b.*?\b(all|files|data|everything)",
    r"\bdrop\s+table",
    r"\btruncate\b.*?\btable",
    r"\bremove\b.*?\b(all|files|data)",
    r"\bdestroy\b",
    r"\bwipe\b",
    r"\berase\b.*?\b(all|files|data)",
];

static PASSWORD_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(PASSWORD_PATTERNS));

static DANGEROUS_REGEXES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(DANGEROUS_PATTERNS));

static PASSWORD_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(password|passphrase|pass)\s*:\s*\S+").expect("valid redaction regex")
});

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("valid security regex")
        })
        .collect()
}

/// True when `text` looks like a request for a password or passphrase.
pub fn is_password_prompt(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    PASSWORD_REGEXES.iter().any(|re| re.is_match(text))
}

/// True when `text` mentions a destructive operation.
pub fn is_dangerous_operation(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    DANGEROUS_REGEXES.iter().any(|re| re.is_match(text))
}

/// Replace the value after each `password:`-style label with `[REDACTED]`.
///
/// ```
/// use sidekick::security::redact_password;
///
/// assert_eq!(
///     redact_password("login ok, password: hunter2 accepted"),
///     "login ok, password: [REDACTED] accepted"
/// );
/// ```
pub fn redact_password(text: &str) -> String {
    PASSWORD_VALUE
        .replace_all(text, format!("$1: {REDACTED}").as_str())
        .into_owned()
}

/// Matched text of every dangerous pattern that fires, in table order.
pub fn get_dangerous_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    DANGEROUS_REGEXES
        .iter()
        .filter_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
        .collect()
}
