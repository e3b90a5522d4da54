//! Custom alias validation.
//!
//! Checks format, length and reserved words. Collisions with existing codes
//! are detected by the store's atomic insert, not here.

use crate::error::AppError;
use crate::utils::code_generator::MAX_CODE_LENGTH;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Compiled regex for the URL-safe alias alphabet.
static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias pattern is a valid regex")
});

/// Path segments used by the service and the presentation layer.
///
/// Codes live at the root of the redirect prefix, so none of these may ever be
/// issued, neither as a custom alias nor as a generated code.
pub const RESERVED_WORDS: &[&str] = &[
    "generate_url",
    "generate_custom_url",
    "dns_resolver",
    "redirect_url",
    "ping",
    "health",
    "api",
    "admin",
    "static",
    "generate",
    "retrieve",
    "custom",
];

/// Validator for caller-chosen aliases.
#[derive(Debug, Clone)]
pub struct AliasValidator {
    max_length: usize,
    reserved: HashSet<String>,
}

impl AliasValidator {
    /// Creates a validator with the built-in reserved words plus `extra_reserved`.
    ///
    /// `max_length` is capped at 32.
    pub fn new(max_length: usize, extra_reserved: &[String]) -> Self {
        let reserved = RESERVED_WORDS
            .iter()
            .map(|w| w.to_ascii_lowercase())
            .chain(extra_reserved.iter().map(|w| w.trim().to_ascii_lowercase()))
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            max_length: max_length.clamp(1, MAX_CODE_LENGTH),
            reserved,
        }
    }

    /// Validates a custom alias.
    ///
    /// # Rules
    ///
    /// - Length: 1 to `max_length` characters
    /// - Allowed characters: ASCII letters, digits, `-` and `_`
    /// - Cannot be a reserved word (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFormat`] for length or character violations and
    /// [`AppError::Reserved`] for reserved words.
    pub fn validate(&self, alias: &str) -> Result<(), AppError> {
        if alias.is_empty() {
            return Err(AppError::invalid_format("Alias must not be empty"));
        }

        if alias.len() > self.max_length {
            return Err(AppError::invalid_format(format!(
                "Alias must be at most {} characters, got {}",
                self.max_length,
                alias.len()
            )));
        }

        if !ALIAS_REGEX.is_match(alias) {
            return Err(AppError::invalid_format(
                "Alias can only contain letters, digits, '-' and '_'",
            ));
        }

        if self.is_reserved(alias) {
            return Err(AppError::Reserved {
                alias: alias.to_string(),
            });
        }

        Ok(())
    }

    /// Returns true if `code` matches a reserved word.
    pub fn is_reserved(&self, code: &str) -> bool {
        self.reserved.contains(&code.to_ascii_lowercase())
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for AliasValidator {
    fn default() -> Self {
        Self::new(MAX_CODE_LENGTH, &[])
    }
}
