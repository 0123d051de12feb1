//! Free-text sanitization and task field validation.
//!
//! # Responsibility
//! - Strip markup-significant characters from user-supplied text.
//! - Check required/length rules for task fields.
//!
//! # Invariants
//! - Callers sanitize first, then validate the sanitized value. Lengths are
//!   therefore measured on exactly what gets stored.
//! - Lengths count Unicode scalar values, not bytes.
//! - Title errors are reported before description errors.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

static TAG_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]*>").expect("valid tag tail regex"));
static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>'"]"#).expect("valid unsafe chars regex"));

/// Result of checking a title/description pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskValidation {
    pub valid: bool,
    /// Human-readable messages, title rule first.
    pub errors: Vec<String>,
}

/// Validates task fields. Both rules run, so both may fail.
///
/// `None` means the field was not supplied at all.
pub fn validate_task(title: Option<&str>, description: Option<&str>) -> TaskValidation {
    let mut errors = Vec::new();

    if let Some(message) = check_field(title, "Title", TITLE_MAX_CHARS) {
        errors.push(message);
    }
    if let Some(message) = check_field(description, "Description", DESCRIPTION_MAX_CHARS) {
        errors.push(message);
    }

    TaskValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_field(value: Option<&str>, label: &str, max_chars: usize) -> Option<String> {
    match value {
        None => Some(format!("{label} is required")),
        Some(text) if text.trim().is_empty() => Some(format!("{label} is required")),
        Some(text) if text.chars().count() > max_chars => Some(format!(
            "{label} must not exceed {max_chars} characters"
        )),
        Some(_) => None,
    }
}

/// Removes tag-like fragments and `< > ' "`, then trims whitespace.
pub fn sanitize_input(input: &str) -> String {
    let without_tag_tails = TAG_TAIL_RE.replace_all(input, "");
    let without_unsafe = UNSAFE_CHARS_RE.replace_all(&without_tag_tails, "");
    without_unsafe.trim().to_string()
}

/// Sanitizes a possibly-missing field; a missing field stays missing.
pub fn sanitize_optional(input: Option<&str>) -> Option<String> {
    input.map(sanitize_input)
}
