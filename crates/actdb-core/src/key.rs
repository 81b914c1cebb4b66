//! # Object Keys — Content-Addressed Identifiers
//!
//! Defines `ObjectKey`, the address of a blob in the content-addressed
//! store: the MD5 digest of the value's canonical JSON form, rendered as
//! 32 lowercase hex characters.
//!
//! MD5 is deliberate: the key is a deduplication address, not a security
//! boundary, and MD5 is fast and universally available. The function
//! signature of [`ObjectKey::compute()`] accepts only `&CanonicalBytes`,
//! so every key in the system is guaranteed to have been computed over
//! canonical bytes.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::error::CoreError;

/// A content key: 32 lowercase hex characters (an MD5 digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Compute the content key of a canonical byte sequence.
    pub fn compute(data: &CanonicalBytes) -> Self {
        let digest = Md5::digest(data.as_bytes());
        let mut hex = String::with_capacity(32);
        for b in digest {
            use std::fmt::Write;
            let _ = write!(hex, "{b:02x}");
        }
        Self(hex)
    }

    /// Parse a key from its hex form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidKey` unless the input is exactly
    /// 32 lowercase hex characters.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
            return Err(CoreError::InvalidKey(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// The key as a hex string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key into path segments `(k[0], k[1], k[2..])`.
    ///
    /// The blob store fans blobs out into two levels of single-character
    /// directories to bound per-directory entry counts.
    pub fn path_segments(&self) -> (&str, &str, &str) {
        (&self.0[0..1], &self.0[1..2], &self.0[2..])
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectKey> for String {
    fn from(k: ObjectKey) -> String {
        k.0
    }
}
