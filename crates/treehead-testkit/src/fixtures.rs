//! Test fixtures and helpers.
//!
//! Deterministic keys, signed tree heads and shard configs for integration
//! tests.

use std::collections::HashMap;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::StdRng;
use parking_lot::Mutex;
use rand::SeedableRng;
use rsa::RsaPrivateKey;

use treehead_core::{Checkpoint, HashAlgorithm, LogPublicKey, LogSigningKey, SignedTreeHead};
use treehead_shard::ShardConfig;

/// Origin line used by fixtures unless told otherwise.
pub const DEFAULT_ORIGIN: &str = "log.example.dev - 2605736670972794746";

/// Signer identity used by fixtures.
pub const DEFAULT_IDENTITY: &str = "log.example.dev";

/// Key algorithms a fixture can sign with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Rsa,
    EcdsaP256,
    Ed25519,
}

impl KeyKind {
    pub const ALL: [KeyKind; 3] = [KeyKind::Rsa, KeyKind::EcdsaP256, KeyKind::Ed25519];

    /// The hash a signer of this kind expects.
    pub fn hash(self) -> HashAlgorithm {
        match self {
            Self::Ed25519 => HashAlgorithm::None,
            Self::Rsa | Self::EcdsaP256 => HashAlgorithm::Sha256,
        }
    }
}

/// A deterministic signing key.
///
/// RSA keys are expensive to generate, so each seed's 2048-bit RSA key is
/// generated once per process and cloned afterwards.
pub fn signing_key(kind: KeyKind, seed: [u8; 32]) -> LogSigningKey {
    match kind {
        KeyKind::Ed25519 => LogSigningKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)),
        KeyKind::EcdsaP256 => LogSigningKey::EcdsaP256(
            p256::ecdsa::SigningKey::from_bytes(&p256::FieldBytes::from(seed))
                .expect("seed is a valid P-256 scalar"),
        ),
        KeyKind::Rsa => rsa_key(seed),
    }
}

fn rsa_key(seed: [u8; 32]) -> LogSigningKey {
    static KEYS: OnceLock<Mutex<HashMap<[u8; 32], LogSigningKey>>> = OnceLock::new();
    let mut keys = KEYS.get_or_init(Default::default).lock();
    keys.entry(seed)
        .or_insert_with(|| {
            let mut rng = StdRng::from_seed(seed);
            let key = RsaPrivateKey::new(&mut rng, 2048).expect("RSA key generation");
            LogSigningKey::Rsa(key)
        })
        .clone()
}

/// A log that signs tree heads with one key.
pub struct TestLog {
    pub kind: KeyKind,
    pub key: LogSigningKey,
    pub origin: String,
    pub identity: String,
}

impl TestLog {
    /// Create a log with a deterministic key from `seed`.
    pub fn with_seed(kind: KeyKind, seed: [u8; 32]) -> Self {
        Self {
            kind,
            key: signing_key(kind, seed),
            origin: DEFAULT_ORIGIN.to_string(),
            identity: DEFAULT_IDENTITY.to_string(),
        }
    }

    /// Create a log with the default seed for `kind`.
    pub fn new(kind: KeyKind) -> Self {
        Self::with_seed(kind, [0x42; 32])
    }

    pub fn public_key(&self) -> LogPublicKey {
        self.key.public_key()
    }

    /// The public key as PEM text.
    pub fn public_key_pem(&self) -> String {
        self.public_key().to_pem().expect("supported key encodes")
    }

    /// A checkpoint for this log. The root hash is derived from `size`.
    pub fn checkpoint(&self, size: u64) -> Checkpoint {
        Checkpoint::new(self.origin.clone(), size, root_hash(size))
    }

    /// A signed tree head for `size` entries at `timestamp`.
    pub fn signed_tree_head(&self, size: u64, timestamp: u64) -> SignedTreeHead {
        let mut sth = SignedTreeHead::new(self.checkpoint(size));
        sth.set_timestamp(timestamp);
        sth.sign(&self.identity, &self.key, self.kind.hash())
            .expect("fixture signing");
        sth
    }

    /// A shard config record retiring this log's tree.
    pub fn shard_record(&self, tree_id: i64, tree_length: i64) -> ShardConfig {
        shard_record(tree_id, tree_length, &self.public_key())
    }
}

/// Logs with distinct keys, one per seed byte.
pub fn multi_log_fixtures(kind: KeyKind, count: usize) -> Vec<TestLog> {
    (0..count)
        .map(|i| {
            let mut seed = [0x42u8; 32];
            seed[0] = i as u8 + 1;
            TestLog::with_seed(kind, seed)
        })
        .collect()
}

/// A shard config record for a tree signed by `key`.
pub fn shard_record(tree_id: i64, tree_length: i64, key: &LogPublicKey) -> ShardConfig {
    let pem = key.to_pem().expect("supported key encodes");
    ShardConfig {
        tree_id,
        tree_length,
        encoded_public_key: STANDARD.encode(pem),
    }
}

/// A 32-byte root hash that depends only on `size`.
pub fn root_hash(size: u64) -> Vec<u8> {
    let mut hash = vec![0u8; 32];
    hash[..8].copy_from_slice(&size.to_be_bytes());
    hash
}

/// Render shard records as the YAML a shard config file holds.
pub fn shard_yaml(records: &[ShardConfig]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "- treeID: {}\n  treeLength: {}\n",
            record.tree_id, record.tree_length
        ));
        if !record.encoded_public_key.is_empty() {
            out.push_str(&format!("  encodedPublicKey: {}\n", record.encoded_public_key));
        }
    }
    out
}
