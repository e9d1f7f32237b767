//! # Treehead Testkit
//!
//! Testing utilities for treehead.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Ed25519 signed tree heads with their exact text
//! - **Generators**: Proptest strategies for checkpoints, signed notes and shard tables
//! - **Fixtures**: Deterministic keys and logs for integration tests
//!
//! ## Golden Vectors
//!
//! ```rust
//! use treehead_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, _) in verify_all_vectors() {
//!     assert!(matches, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use treehead_testkit::generators::checkpoint;
//!
//! proptest! {
//!     #[test]
//!     fn checkpoint_roundtrips(cp in checkpoint()) {
//!         let parsed = Checkpoint::from_text(&cp.to_text()).unwrap();
//!         prop_assert_eq!(parsed, cp);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use treehead_testkit::fixtures::{KeyKind, TestLog};
//!
//! let log = TestLog::new(KeyKind::EcdsaP256);
//! let sth = log.signed_tree_head(42, 1_700_000_000);
//! assert!(sth.verify(&log.public_key()));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_log_fixtures, signing_key, KeyKind, TestLog};
pub use generators::ShardParams;
pub use vectors::{all_vectors, generate_tree_head_from_vector, verify_all_vectors, GoldenVector};
