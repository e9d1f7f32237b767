//! Error types for the unified API.

use thiserror::Error;
use treehead_core::{FormatError, KeyError, SigningError};
use treehead_shard::{ConfigError, LookupError};

/// Errors that can occur while signing, loading shards, or verifying.
#[derive(Debug, Error)]
pub enum TreeHeadError {
    /// Malformed checkpoint or signed note text.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Signing failed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// A public key could not be parsed.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// The shard table could not be built.
    #[error("shard config error: {0}")]
    Config(#[from] ConfigError),

    /// No key is known for a tree.
    #[error("shard lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Failure reported by caller-supplied code, such as fetching a tree head.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for unified API operations.
pub type Result<T> = std::result::Result<T, TreeHeadError>;
