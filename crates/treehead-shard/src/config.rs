//! Shard configuration records and where they come from.
//!
//! The on-disk format is a YAML list:
//!
//! ```yaml
//! - treeID: 1
//!   treeLength: 5
//!   encodedPublicKey: LS0tLS1CRUdJTi...
//! - treeID: 2
//!   treeLength: 3
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One retired shard as written in the shard config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardConfig {
    /// Tree id of the shard.
    #[serde(rename = "treeID")]
    pub tree_id: i64,

    /// Number of entries in the shard.
    #[serde(rename = "treeLength")]
    pub tree_length: i64,

    /// Base64 of the shard's public key (PEM). Empty means "same key as the
    /// active shard".
    #[serde(rename = "encodedPublicKey", default)]
    pub encoded_public_key: String,
}

/// Where a shard table is loaded from.
#[derive(Debug, Clone)]
pub enum ShardSource {
    /// A YAML file on disk.
    Path(PathBuf),
    /// YAML content already read into memory.
    Yaml(Vec<u8>),
    /// Records already decoded by the caller.
    Records(Vec<ShardConfig>),
}

impl ShardSource {
    /// Produce the shard records. Empty content yields no records.
    pub fn into_records(self) -> Result<Vec<ShardConfig>> {
        match self {
            Self::Path(path) => {
                let contents = std::fs::read(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_yaml(&contents)
            }
            Self::Yaml(contents) => parse_yaml(&contents),
            Self::Records(records) => Ok(records),
        }
    }
}

impl From<PathBuf> for ShardSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<ShardConfig>> for ShardSource {
    fn from(records: Vec<ShardConfig>) -> Self {
        Self::Records(records)
    }
}

/// Parse a YAML list of shard records. Empty or `null` content is an empty list.
pub fn parse_yaml(contents: &[u8]) -> Result<Vec<ShardConfig>> {
    if contents.is_empty() {
        return Ok(Vec::new());
    }
    let records: Option<Vec<ShardConfig>> = serde_yaml::from_slice(contents)?;
    Ok(records.unwrap_or_default())
}
