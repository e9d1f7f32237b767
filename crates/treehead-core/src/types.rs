//! Strong type definitions for treehead.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 4-byte key hint identifying the key that produced a note signature.
///
/// Computed as the first four bytes (big-endian) of SHA-256 over the signer's
/// DER-encoded SubjectPublicKeyInfo. Hints can collide; they narrow the
/// candidate keys, they do not authenticate anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHint(pub u32);

impl KeyHint {
    /// Derive the hint for a DER-encoded public key.
    pub fn for_public_key_der(der: &[u8]) -> Self {
        let digest = Sha256::digest(der);
        Self::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    }

    /// Create from the 4-byte big-endian wire form.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Get the 4-byte big-endian wire form.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.to_be_bytes())
    }
}

impl fmt::Debug for KeyHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHint({})", self.to_hex())
    }
}

impl fmt::Display for KeyHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<u32> for KeyHint {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
