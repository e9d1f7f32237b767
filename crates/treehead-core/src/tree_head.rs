//! Signed tree heads: signed checkpoints carrying a timestamp line.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::checkpoint::Checkpoint;
use crate::error::FormatError;
use crate::note::Note;
use crate::signed_note::SignedNote;

/// Prefix of the timestamp extension line.
const TIMESTAMP_PREFIX: &str = "Timestamp: ";

/// A signed checkpoint with a `Timestamp: <seconds>` extension line.
///
/// Dereferences to the underlying [`SignedNote`], so signing and verifying
/// work exactly as for any other signed note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTreeHead(pub SignedNote<Checkpoint>);

impl SignedTreeHead {
    /// Wrap an unsigned checkpoint.
    pub fn new(checkpoint: Checkpoint) -> Self {
        Self(SignedNote::new(checkpoint))
    }

    /// The underlying checkpoint.
    pub fn checkpoint(&self) -> &Checkpoint {
        &self.0.note
    }

    /// Set the timestamp, replacing any existing timestamp line.
    ///
    /// Any signatures already present no longer cover the new text.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        let lines = &mut self.0.note.other_content;
        lines.retain(|line| parse_timestamp_line(line).is_none());
        lines.push(format!("{TIMESTAMP_PREFIX}{timestamp}"));
    }

    /// The timestamp from the first timestamp line, or 0 if there is none.
    pub fn timestamp(&self) -> u64 {
        self.0
            .note
            .other_content
            .iter()
            .find_map(|line| parse_timestamp_line(line))
            .unwrap_or(0)
    }

    /// Unwrap into the signed note.
    pub fn into_inner(self) -> SignedNote<Checkpoint> {
        self.0
    }
}

/// Parse `Timestamp: <decimal>`, accepting trailing text after the digits.
fn parse_timestamp_line(line: &str) -> Option<u64> {
    let rest = line.strip_prefix(TIMESTAMP_PREFIX)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

impl Deref for SignedTreeHead {
    type Target = SignedNote<Checkpoint>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SignedTreeHead {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<SignedNote<Checkpoint>> for SignedTreeHead {
    fn from(note: SignedNote<Checkpoint>) -> Self {
        Self(note)
    }
}

impl Note for SignedTreeHead {
    fn to_text(&self) -> Vec<u8> {
        self.0.to_text()
    }

    fn from_text(data: &[u8]) -> Result<Self, FormatError> {
        SignedNote::from_text(data).map(Self)
    }
}

impl fmt::Display for SignedTreeHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{HashAlgorithm, LogSigningKey};

    fn tree_head() -> SignedTreeHead {
        SignedTreeHead::new(Checkpoint::new("log.example.dev - 7", 3, vec![0x22; 32]))
    }

    #[test]
    fn test_timestamp_defaults_to_zero() {
        assert_eq!(tree_head().timestamp(), 0);
    }

    #[test]
    fn test_set_timestamp_appends_line() {
        let mut sth = tree_head();
        sth.set_timestamp(1_700_000_000);
        assert_eq!(sth.timestamp(), 1_700_000_000);
        assert_eq!(sth.checkpoint().other_content, vec!["Timestamp: 1700000000"]);
    }

    #[test]
    fn test_set_timestamp_replaces_existing() {
        let mut sth = tree_head();
        sth.0.note.other_content.push("origin: a".into());
        sth.set_timestamp(1);
        sth.0.note.other_content.push("origin: b".into());
        sth.set_timestamp(2);

        let lines = &sth.checkpoint().other_content;
        let timestamps: Vec<_> = lines.iter().filter(|l| l.starts_with("Timestamp:")).collect();
        assert_eq!(timestamps, vec!["Timestamp: 2"]);
        assert_eq!(lines, &vec!["origin: a", "origin: b", "Timestamp: 2"]);
        assert_eq!(sth.timestamp(), 2);
    }

    #[test]
    fn test_set_timestamp_removes_duplicates() {
        let mut sth = tree_head();
        sth.0.note.other_content = vec!["Timestamp: 5".into(), "Timestamp: 6".into()];
        assert_eq!(sth.timestamp(), 5);

        sth.set_timestamp(7);
        assert_eq!(sth.checkpoint().other_content, vec!["Timestamp: 7"]);
    }

    #[test]
    fn test_non_numeric_timestamp_is_ignored() {
        let mut sth = tree_head();
        sth.0.note.other_content = vec!["Timestamp: soon".into(), "Timestamp: 9".into()];
        assert_eq!(sth.timestamp(), 9);
    }

    #[test]
    fn test_parse_timestamp_line() {
        assert_eq!(parse_timestamp_line("Timestamp: 42"), Some(42));
        assert_eq!(parse_timestamp_line("Timestamp: 42s"), Some(42));
        assert_eq!(parse_timestamp_line("Timestamp: "), None);
        assert_eq!(parse_timestamp_line("timestamp: 42"), None);
        assert_eq!(parse_timestamp_line("Timestamp:42"), None);
    }

    #[test]
    fn test_signed_tree_head_roundtrip() {
        let key = LogSigningKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[5; 32]));
        let mut sth = tree_head();
        sth.set_timestamp(1_234);
        sth.sign("log.example.dev", &key, HashAlgorithm::None).unwrap();

        let parsed = SignedTreeHead::from_text(&sth.to_text()).unwrap();
        assert_eq!(parsed, sth);
        assert_eq!(parsed.timestamp(), 1_234);
        assert!(parsed.verify(&key.public_key()));
    }
}
