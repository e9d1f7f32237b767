//! # Treehead Core
//!
//! Pure primitives for transparency log checkpoints: the checkpoint text
//! format, signed notes, and signed tree heads.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over text and signatures.
//!
//! ## Key Types
//!
//! - [`Checkpoint`] - A log's size and root hash plus extension lines
//! - [`Note`] - The payload contract a [`SignedNote`] wraps
//! - [`SignedNote`] - A note followed by named signature lines
//! - [`SignedTreeHead`] - A signed checkpoint with a timestamp line
//! - [`LogSigningKey`] / [`LogPublicKey`] - RSA, ECDSA P-256 and Ed25519 keys
//! - [`KeyHint`] - 4-byte identifier of a signing key
//!
//! ## Signing
//!
//! ```rust
//! use treehead_core::{Checkpoint, HashAlgorithm, LogSigningKey, Note, SignedNote};
//!
//! let key = LogSigningKey::generate_ecdsa_p256();
//! let mut note = SignedNote::new(Checkpoint::new("log.example.dev - 1", 10, vec![0u8; 32]));
//! note.sign("log.example.dev", &key, HashAlgorithm::Sha256).unwrap();
//!
//! let parsed = SignedNote::<Checkpoint>::from_text(&note.to_text()).unwrap();
//! assert!(parsed.verify(&key.public_key()));
//! ```

pub mod checkpoint;
pub mod crypto;
pub mod error;
pub mod note;
pub mod signed_note;
pub mod tree_head;
pub mod types;
pub mod validation;

pub use checkpoint::Checkpoint;
pub use crypto::{HashAlgorithm, LogPublicKey, LogSigningKey, NoteSigner};
pub use error::{FormatError, KeyError, SigningError};
pub use note::Note;
pub use signed_note::{NoteSignature, SignedNote, SIGNATURE_DASH};
pub use tree_head::SignedTreeHead;
pub use types::KeyHint;
pub use validation::{is_valid_checkpoint, is_valid_signed_note, is_valid_signed_tree_head};
