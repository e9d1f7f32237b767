//! Golden test vectors for signed tree heads.
//!
//! Ed25519 and the checkpoint text format are both deterministic, so a seed,
//! a size and a timestamp pin down the exact signed text. The expected texts
//! were produced by an independent Ed25519 implementation.

use serde::{Deserialize, Serialize};

use treehead_core::{Checkpoint, HashAlgorithm, LogSigningKey, Note, SignedTreeHead};

use crate::fixtures::{root_hash, DEFAULT_IDENTITY};

/// A golden test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: String,
    /// Ed25519 seed, hex.
    pub seed: String,
    /// Origin line of the checkpoint.
    pub origin: String,
    /// Log size.
    pub size: u64,
    /// Timestamp line value.
    pub timestamp: u64,
    /// Expected key hint, hex.
    pub expected_key_hint: String,
    /// Expected signed tree head text.
    pub expected_text: String,
}

fn vector(
    name: &str,
    seed: u8,
    origin: &str,
    size: u64,
    timestamp: u64,
    hint: &str,
    hash: &str,
    signature: &str,
) -> GoldenVector {
    GoldenVector {
        name: name.to_string(),
        seed: hex_seed(seed),
        origin: origin.to_string(),
        size,
        timestamp,
        expected_key_hint: hint.to_string(),
        expected_text: format!(
            "{origin}\n{size}\n{hash}\nTimestamp: {timestamp}\n\n\u{2014} {DEFAULT_IDENTITY} {signature}\n"
        ),
    }
}

fn hex_seed(byte: u8) -> String {
    format!("{byte:02x}").repeat(32)
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        vector(
            "empty log",
            0x42,
            "log.example.dev - 2605736670972794746",
            0,
            0,
            "9a82517f",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "moJRfzkwCxjQEIQiN4S+IzBQkDgsWMrtGzsVTMXNG8/0NbMhlChLnFjnjLESgOii7Pc4F4zNEjItaS2ItQgr3nb/ngU=",
        ),
        vector(
            "ten entries",
            0x42,
            "log.example.dev - 2605736670972794746",
            10,
            1_700_000_000,
            "9a82517f",
            "AAAAAAAAAAoAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "moJRf+kXAzbyfI9uKdf7So0G/TpUMihk1QLxadaoTpqhqbPr42kv7G0WYVnTgaVAVXsgE2I2rDik0mvGMhXdMbAEtAM=",
        ),
        vector(
            "other key and origin",
            0x07,
            "rekor.sigstore.dev - 1193050959916656506",
            123_456_789,
            1_736_870_400,
            "324be2de",
            "AAAAAAdbzRUAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "Mkvi3jelXlOMZYZYiOyUPds6dNYmg98jaBYbOdfkOlmwFCjTYoXsYZJ9OC+aLzN2dPSRYyoSL68QCCwHXFLRak5uAQM=",
        ),
    ]
}

/// The signing key a vector names.
pub fn vector_key(vector: &GoldenVector) -> LogSigningKey {
    let mut seed = [0u8; 32];
    for (i, byte) in seed.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&vector.seed[2 * i..2 * i + 2], 16).expect("hex seed");
    }
    LogSigningKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed))
}

/// Build and sign the tree head a vector describes.
pub fn generate_tree_head_from_vector(vector: &GoldenVector) -> SignedTreeHead {
    let key = vector_key(vector);
    let checkpoint = Checkpoint::new(vector.origin.clone(), vector.size, root_hash(vector.size));
    let mut sth = SignedTreeHead::new(checkpoint);
    sth.set_timestamp(vector.timestamp);
    sth.sign(DEFAULT_IDENTITY, &key, HashAlgorithm::None)
        .expect("ed25519 signing");
    sth
}

/// Check every vector, returning `(name, matches, produced text)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let text = String::from_utf8(generate_tree_head_from_vector(v).to_text())
                .expect("tree head text is UTF-8");
            (v.name.clone(), text == v.expected_text, text)
        })
        .collect()
}

/// All vectors as pretty-printed JSON.
pub fn vectors_json() -> String {
    serde_json::to_string_pretty(&all_vectors()).expect("vectors serialize")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, text) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced:\n{text}");
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            let a = generate_tree_head_from_vector(&vector).to_text();
            let b = generate_tree_head_from_vector(&vector).to_text();
            assert_eq!(a, b, "vector '{}' changed on regeneration", vector.name);
        }
    }

    #[test]
    fn test_vector_key_hints() {
        for vector in all_vectors() {
            let sth = generate_tree_head_from_vector(&vector);
            assert_eq!(sth.signatures[0].key_hint.to_hex(), vector.expected_key_hint);
        }
    }

    #[test]
    fn test_vectors_verify_and_parse() {
        for vector in all_vectors() {
            let key = vector_key(&vector).public_key();
            let parsed = SignedTreeHead::from_text(vector.expected_text.as_bytes()).unwrap();
            assert!(parsed.verify(&key), "vector '{}'", vector.name);
            assert_eq!(parsed.timestamp(), vector.timestamp);
            assert_eq!(parsed.checkpoint().size, vector.size);
        }
    }

    #[test]
    fn test_vectors_json_roundtrip() {
        let parsed: Vec<GoldenVector> = serde_json::from_str(&vectors_json()).unwrap();
        assert_eq!(parsed, all_vectors());
    }
}
