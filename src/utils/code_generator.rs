//! Short code generation.
//!
//! Codes are drawn uniformly from a configurable URL-safe alphabet using the
//! thread-local CSPRNG, so consecutive codes reveal nothing about each other
//! and the keyspace cannot be enumerated.

use anyhow::{Result, bail};
use rand::Rng;
use std::collections::HashSet;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default alphabet: the RFC 4648 URL-safe base64 characters.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Default generated code length.
pub const DEFAULT_CODE_LENGTH: usize = 8;

pub const MIN_CODE_LENGTH: usize = 6;

/// Maximum length of any stored code, generated or custom.
pub const MAX_CODE_LENGTH: usize = 32;

const MIN_ALPHABET_SIZE: usize = 16;

/// Returns true if `c` belongs to the URL-safe code alphabet.
pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Returns true if `code` could have been stored at all.
///
/// Used on the resolution path to skip store lookups for garbage input.
pub fn is_well_formed_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= MAX_CODE_LENGTH && code.chars().all(is_code_char)
}

/// Random fixed-length code generator.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
    #[cfg(test)]
    scripted: Option<(Arc<[String]>, Arc<AtomicUsize>)>,
}

impl CodeGenerator {
    /// Creates a generator for the given alphabet and code length.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `length` is outside `6..=32`
    /// - the alphabet has fewer than 16 characters
    /// - the alphabet contains duplicates or characters outside `A-Z a-z 0-9 - _`
    pub fn new(alphabet: &str, length: usize) -> Result<Self> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            bail!(
                "code length must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                length
            );
        }

        let chars: Vec<char> = alphabet.chars().collect();

        if let Some(bad) = chars.iter().find(|c| !is_code_char(**c)) {
            bail!("code alphabet contains non URL-safe character '{}'", bad);
        }

        let unique: HashSet<char> = chars.iter().copied().collect();
        if unique.len() != chars.len() {
            bail!("code alphabet contains duplicate characters");
        }

        if chars.len() < MIN_ALPHABET_SIZE {
            bail!(
                "code alphabet must have at least {} characters, got {}",
                MIN_ALPHABET_SIZE,
                chars.len()
            );
        }

        Ok(Self {
            alphabet: chars,
            length,
            #[cfg(test)]
            scripted: None,
        })
    }

    /// Generator that cycles through `codes` instead of drawing randomly.
    #[cfg(test)]
    pub(crate) fn scripted(codes: &[&str]) -> Self {
        assert!(!codes.is_empty(), "scripted generator needs at least one code");
        let codes: Arc<[String]> = codes.iter().map(|c| c.to_string()).collect();
        Self {
            scripted: Some((codes, Arc::new(AtomicUsize::new(0)))),
            ..Self::default()
        }
    }

    /// Generates a random code.
    ///
    /// Uniqueness is not checked here; the caller inserts with
    /// `insert_if_absent` and retries on collision.
    pub fn generate(&self) -> String {
        #[cfg(test)]
        if let Some((codes, next)) = &self.scripted {
            return codes[next.fetch_add(1, Ordering::Relaxed) % codes.len()].clone();
        }

        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet.len()
    }

    /// Returns true if `code` has this generator's length and alphabet.
    pub fn matches(&self, code: &str) -> bool {
        code.chars().count() == self.length && code.chars().all(|c| self.alphabet.contains(&c))
    }

    /// Approximate number of codes that can be issued before the first
    /// collision becomes likely, `sqrt(A^L)`.
    pub fn birthday_bound(&self) -> f64 {
        (self.alphabet.len() as f64).powf(self.length as f64 / 2.0)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
            #[cfg(test)]
            scripted: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_has_configured_length() {
        let generator = CodeGenerator::new(DEFAULT_ALPHABET, 7).unwrap();
        assert_eq!(generator.generate().len(), 7);
    }

    #[test]
    fn test_generate_code_url_safe_characters() {
        let generator = CodeGenerator::default();
        for _ in 0..100 {
            let code = generator.generate();
            assert!(code.chars().all(is_code_char));
            assert!(generator.matches(&code));
        }
    }

    #[test]
    fn test_generate_code_respects_alphabet() {
        let generator = CodeGenerator::new("abcdefghijklmnop", 10).unwrap();
        for _ in 0..100 {
            let code = generator.generate();
            assert!(code.chars().all(|c| ('a'..='p').contains(&c)));
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let generator = CodeGenerator::default();
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_rejects_invalid_length() {
        assert!(CodeGenerator::new(DEFAULT_ALPHABET, 5).is_err());
        assert!(CodeGenerator::new(DEFAULT_ALPHABET, 33).is_err());
        assert!(CodeGenerator::new(DEFAULT_ALPHABET, 6).is_ok());
        assert!(CodeGenerator::new(DEFAULT_ALPHABET, 32).is_ok());
    }

    #[test]
    fn test_rejects_unsafe_alphabet() {
        assert!(CodeGenerator::new("abcdefghijklmno/", 8).is_err());
        assert!(CodeGenerator::new("abcdefghijklmnoa", 8).is_err());
        assert!(CodeGenerator::new("abcdef", 8).is_err());
    }

    #[test]
    fn test_birthday_bound() {
        let generator = CodeGenerator::default();
        // 64^4 = 16_777_216
        assert_eq!(generator.birthday_bound().round(), 16_777_216.0);
    }

    #[test]
    fn test_scripted_generator_cycles() {
        let generator = CodeGenerator::scripted(&["first1", "second"]);
        assert_eq!(generator.generate(), "first1");
        assert_eq!(generator.generate(), "second");
        assert_eq!(generator.generate(), "first1");
    }

    #[test]
    fn test_is_well_formed_code() {
        assert!(is_well_formed_code("abc-DEF_123"));
        assert!(!is_well_formed_code(""));
        assert!(!is_well_formed_code("has space"));
        assert!(!is_well_formed_code("dot.dot"));
        assert!(!is_well_formed_code(&"a".repeat(33)));
    }
}
