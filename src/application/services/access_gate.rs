//! API key authorization for mutating operations.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Longest key name that fits the `owner_key_id` column.
pub const MAX_KEY_ID_LENGTH: usize = 64;

/// A configured API key with its audit identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyEntry {
    pub id: String,
    pub secret: String,
}

impl ApiKeyEntry {
    /// Parses a `name:secret` or bare `secret` entry.
    ///
    /// Bare secrets get the id `key-<first 12 hex chars of sha256(secret)>`, so
    /// records can be attributed without storing the secret itself.
    /// Returns `None` for blank entries.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        match raw.split_once(':') {
            Some((id, secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Some(Self {
                    id: id.trim().to_string(),
                    secret: secret.trim().to_string(),
                })
            }
            _ => Some(Self {
                id: fingerprint(raw),
                secret: raw.to_string(),
            }),
        }
    }
}

impl fmt::Debug for ApiKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyEntry")
            .field("id", &self.id)
            .field("secret", &"***")
            .finish()
    }
}

/// Short, non-reversible identifier for a key secret.
pub fn fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    format!("key-{}", &hex::encode(digest)[..12])
}

/// Identifier of an authorized API key, recorded as `owner_key_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyId(pub String);

impl KeyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gate that checks presented API keys against the configured set.
///
/// Keys are kept as HMAC-SHA256 tags under a per-process random key. A
/// presented key is MACed once and verified against every entry with
/// [`Mac::verify_slice`], which compares in constant time, and the scan never
/// exits early, so response timing does not reveal how much of a key matched
/// or which entry did.
pub struct AccessGate {
    mac_key: [u8; 32],
    entries: Vec<(String, Vec<u8>)>,
}

impl AccessGate {
    /// Creates a gate for the given keys.
    pub fn new(keys: &[ApiKeyEntry]) -> Self {
        let mut mac_key = [0u8; 32];
        rand::Rng::fill(&mut rand::rng(), &mut mac_key[..]);

        let mut gate = Self {
            mac_key,
            entries: Vec::with_capacity(keys.len()),
        };

        gate.entries = keys
            .iter()
            .map(|k| (k.id.clone(), gate.tag(&k.secret)))
            .collect();

        gate
    }

    fn mac(&self, key: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.mac_key).expect("HMAC accepts any key length");
        mac.update(key.as_bytes());
        mac
    }

    fn tag(&self, key: &str) -> Vec<u8> {
        self.mac(key).finalize().into_bytes().to_vec()
    }

    /// Authorizes a presented API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is empty or not configured.
    pub fn authorize(&self, api_key: &str) -> Result<KeyId, AppError> {
        if api_key.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let presented = self.mac(api_key);
        let mut matched: Option<&str> = None;

        for (id, tag) in &self.entries {
            if presented.clone().verify_slice(tag).is_ok() && matched.is_none() {
                matched = Some(id);
            }
        }

        matched
            .map(|id| KeyId(id.to_string()))
            .ok_or(AppError::Unauthorized)
    }

    /// Number of configured keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(&[
            ApiKeyEntry::parse("frontend:front-secret").unwrap(),
            ApiKeyEntry::parse("bare-secret").unwrap(),
        ])
    }

    #[test]
    fn test_authorize_named_key() {
        let key_id = gate().authorize("front-secret").unwrap();
        assert_eq!(key_id.as_str(), "frontend");
    }

    #[test]
    fn test_authorize_bare_key_uses_fingerprint() {
        let key_id = gate().authorize("bare-secret").unwrap();
        assert_eq!(key_id.as_str(), fingerprint("bare-secret"));
        assert!(key_id.as_str().starts_with("key-"));
        assert_eq!(key_id.as_str().len(), 16);
    }

    #[test]
    fn test_authorize_invalid_key() {
        let result = gate().authorize("wrong");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_authorize_empty_key() {
        assert!(matches!(gate().authorize(""), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_authorize_prefix_of_key_fails() {
        assert!(gate().authorize("front").is_err());
        assert!(gate().authorize("front-secret-and-more").is_err());
    }

    #[test]
    fn test_empty_gate_rejects_everything() {
        let gate = AccessGate::new(&[]);
        assert!(gate.is_empty());
        assert!(gate.authorize("anything").is_err());
    }

    #[test]
    fn test_parse_entries() {
        assert_eq!(ApiKeyEntry::parse("   "), None);

        let named = ApiKeyEntry::parse(" ops : s3cret ").unwrap();
        assert_eq!(named.id, "ops");
        assert_eq!(named.secret, "s3cret");

        let trailing_colon = ApiKeyEntry::parse("weird:").unwrap();
        assert_eq!(trailing_colon.secret, "weird:");
    }

    #[test]
    fn test_debug_masks_secret() {
        let entry = ApiKeyEntry::parse("ops:s3cret").unwrap();
        let debug = format!("{:?}", entry);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("ops"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
    }
}
