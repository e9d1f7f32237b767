//! Verifying tree heads of a sharded log.
//!
//! A global entry index is mapped to the shard that holds it, the shard's
//! public key is looked up, and the tree head fetched for that shard is
//! checked against the key.

use std::sync::Arc;

use treehead_core::{LogPublicKey, SignedTreeHead};
use treehead_shard::{LogRanges, ShardSource};

use crate::error::Result;

/// Configuration for a [`ShardedVerifier`].
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// PEM public key of the active tree.
    pub active_public_key: String,
    /// Tree id of the active tree.
    pub active_tree_id: i64,
    /// Retired shards, if the log has any.
    pub shards: Option<ShardSource>,
    /// Emit a warning for every tree head that fails verification.
    pub log_failures: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            active_public_key: String::new(),
            active_tree_id: 0,
            shards: None,
            log_failures: true,
        }
    }
}

/// Where a global index lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub tree_id: i64,
    pub local_index: u64,
}

/// Outcome of checking a tree head for a global index.
#[derive(Debug, Clone)]
pub struct ShardVerification {
    pub location: Location,
    /// The tree head that was checked.
    pub tree_head: SignedTreeHead,
    /// A signature verified under the shard's key.
    pub signature_valid: bool,
}

impl ShardVerification {
    /// The tree head is signed and its size includes the entry.
    pub fn covers_entry(&self) -> bool {
        self.signature_valid && self.location.local_index < self.tree_head.checkpoint().size
    }
}

/// Verifies signed tree heads against per-shard keys.
#[derive(Debug)]
pub struct ShardedVerifier {
    ranges: Arc<LogRanges>,
    active_public_key: String,
    log_failures: bool,
}

impl ShardedVerifier {
    /// Build a verifier, loading the shard table from `config.shards`.
    pub fn new(config: VerifierConfig) -> Result<Self> {
        LogPublicKey::from_pem(&config.active_public_key)?;
        let ranges = LogRanges::load(config.shards, config.active_tree_id)?;
        tracing::info!(ranges = %ranges, "Created sharded verifier");
        Ok(Self {
            ranges: Arc::new(ranges),
            active_public_key: config.active_public_key,
            log_failures: config.log_failures,
        })
    }

    /// Build a verifier over a shard table shared with other components.
    pub fn with_ranges(active_public_key: impl Into<String>, ranges: Arc<LogRanges>) -> Result<Self> {
        let active_public_key = active_public_key.into();
        LogPublicKey::from_pem(&active_public_key)?;
        Ok(Self {
            ranges,
            active_public_key,
            log_failures: true,
        })
    }

    /// The shard table.
    pub fn ranges(&self) -> &Arc<LogRanges> {
        &self.ranges
    }

    /// Map a global index to its shard and local index.
    pub fn locate(&self, global_index: u64) -> Location {
        let (tree_id, local_index) = self.ranges.resolve_virtual_index(global_index);
        Location {
            tree_id,
            local_index,
        }
    }

    /// The public key that signs tree heads of `tree_id`. Shard keys may be
    /// PEM or DER.
    pub fn key_for_tree(&self, tree_id: i64) -> Result<LogPublicKey> {
        let key = self
            .ranges
            .public_key(&self.active_public_key, Some(&tree_id.to_string()))?;
        Ok(LogPublicKey::from_pem_or_der(&key)?)
    }

    /// Check a tree head of `tree_id` against that tree's key.
    pub fn verify_tree_head(&self, tree_id: i64, tree_head: &SignedTreeHead) -> Result<bool> {
        let key = self.key_for_tree(tree_id)?;
        let valid = tree_head.verify(&key);
        if !valid && self.log_failures {
            tracing::warn!(
                tree_id,
                size = tree_head.checkpoint().size,
                algorithm = key.algorithm(),
                "tree head failed verification"
            );
        }
        Ok(valid)
    }

    /// Locate `global_index`, fetch the tree head of its shard with `fetch`,
    /// and verify it.
    pub fn verify_index<F>(&self, global_index: u64, fetch: F) -> Result<ShardVerification>
    where
        F: FnOnce(i64) -> anyhow::Result<SignedTreeHead>,
    {
        let location = self.locate(global_index);
        tracing::debug!(
            global_index,
            tree_id = location.tree_id,
            local_index = location.local_index,
            "resolved global index"
        );
        let tree_head = fetch(location.tree_id)?;
        let signature_valid = self.verify_tree_head(location.tree_id, &tree_head)?;
        Ok(ShardVerification {
            location,
            tree_head,
            signature_valid,
        })
    }
}
