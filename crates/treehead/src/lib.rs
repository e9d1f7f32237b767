//! # Treehead
//!
//! Signed tree heads for sharded transparency logs.
//!
//! ## Overview
//!
//! - **Checkpoints**: a log's size and root hash in the checkpoint text format
//! - **Signed notes**: checkpoints followed by named RSA, ECDSA or Ed25519 signatures
//! - **Signed tree heads**: signed checkpoints carrying a timestamp line
//! - **Shards**: retired trees and their keys, with global index resolution
//!
//! ## Usage
//!
//! ```rust
//! use treehead::core::{Checkpoint, HashAlgorithm, LogSigningKey, Note};
//! use treehead::{ShardedVerifier, SignedTreeHead, VerifierConfig};
//!
//! let key = LogSigningKey::generate_ed25519();
//! let pem = key.public_key().to_pem().unwrap();
//!
//! let mut sth = SignedTreeHead::new(Checkpoint::new("log.example.dev - 1", 10, vec![0u8; 32]));
//! sth.set_timestamp(1_700_000_000);
//! sth.sign("log.example.dev", &key, HashAlgorithm::None).unwrap();
//! let text = sth.to_text();
//!
//! let verifier = ShardedVerifier::new(VerifierConfig {
//!     active_public_key: pem,
//!     active_tree_id: 1,
//!     ..VerifierConfig::default()
//! })
//! .unwrap();
//!
//! let result = verifier
//!     .verify_index(3, |_tree_id| Ok(SignedTreeHead::from_text(&text)?))
//!     .unwrap();
//! assert!(result.covers_entry());
//! ```
//!
//! ## Re-exports
//!
//! - `treehead::core` - Checkpoints, signed notes, keys
//! - `treehead::shard` - Shard table and shard config

pub mod error;
pub mod verifier;

// Re-export component crates
pub use treehead_core as core;
pub use treehead_shard as shard;

pub use error::{Result, TreeHeadError};
pub use verifier::{Location, ShardVerification, ShardedVerifier, VerifierConfig};

// Re-export commonly used types
pub use treehead_core::{
    Checkpoint, HashAlgorithm, KeyHint, LogPublicKey, LogSigningKey, Note, NoteSigner,
    SignedNote, SignedTreeHead,
};
pub use treehead_shard::{LogRange, LogRanges, ShardConfig, ShardSource};
