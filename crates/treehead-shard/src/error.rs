//! Error types for the shard table.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or mutating a shard table.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A shard config was supplied without an active tree.
    #[error("non-zero active tree id required with a shard config")]
    ZeroActiveTreeId,

    /// The shard config file could not be read.
    #[error("reading shard config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shard config is not valid YAML for a list of shard records.
    #[error("parsing shard config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A shard's public key is not valid base64.
    #[error("decoding public key for tree {tree_id}: {source}")]
    PublicKeyEncoding {
        tree_id: i64,
        #[source]
        source: base64::DecodeError,
    },

    /// A shard has a negative length.
    #[error("tree {tree_id} has negative length {tree_length}")]
    NegativeLength { tree_id: i64, tree_length: i64 },

    /// The inactive shard lengths add up to more than `i64::MAX`.
    #[error("inactive shard lengths overflow at tree {0}")]
    LengthOverflow(i64),

    /// The same tree appears twice among the inactive shards.
    #[error("tree {0} is listed more than once")]
    DuplicateTreeId(i64),

    /// The active tree is also listed as inactive.
    #[error("active tree {0} is also listed as inactive")]
    ActiveTreeIsInactive(i64),
}

/// Errors raised while looking up a shard's public key.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The tree id is not an integer.
    #[error("invalid tree ID {value:?}: {source}")]
    InvalidTreeId {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// No shard has this tree id.
    #[error("{0} is not a valid tree ID and doesn't have an associated public key")]
    UnknownTreeId(i64),
}

/// Result type for shard table construction and mutation.
pub type Result<T> = std::result::Result<T, ConfigError>;
