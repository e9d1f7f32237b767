//! The shard range table.
//!
//! A sharded log is an ordered list of retired (inactive) trees followed by
//! one active tree. Global indexes count through the inactive trees in order
//! and then continue into the active tree.
//!
//! Readers take an `Arc` snapshot of the table; writers build a new table and
//! swap it in, so a reader never observes a half-applied update.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::RwLock;

use crate::config::{ShardConfig, ShardSource};
use crate::error::{ConfigError, LookupError, Result};

/// One retired shard with its decoded public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRange {
    pub tree_id: i64,
    pub tree_length: i64,
    pub encoded_public_key: String,
    decoded_public_key: Vec<u8>,
}

impl LogRange {
    /// Build a shard, decoding `encoded_public_key` (base64 of a PEM or DER
    /// key). An empty key stays empty.
    pub fn new(tree_id: i64, tree_length: i64, encoded_public_key: impl Into<String>) -> Result<Self> {
        let encoded_public_key = encoded_public_key.into();
        if tree_length < 0 {
            return Err(ConfigError::NegativeLength {
                tree_id,
                tree_length,
            });
        }
        let decoded_public_key = STANDARD
            .decode(&encoded_public_key)
            .map_err(|source| ConfigError::PublicKeyEncoding { tree_id, source })?;
        Ok(Self {
            tree_id,
            tree_length,
            encoded_public_key,
            decoded_public_key,
        })
    }

    /// The shard's public key bytes, empty if it shares the active key.
    pub fn decoded_public_key(&self) -> &[u8] {
        &self.decoded_public_key
    }

    fn length(&self) -> u64 {
        u64::try_from(self.tree_length).unwrap_or(0)
    }
}

impl TryFrom<ShardConfig> for LogRange {
    type Error = ConfigError;

    fn try_from(config: ShardConfig) -> Result<Self> {
        Self::new(config.tree_id, config.tree_length, config.encoded_public_key)
    }
}

impl From<&LogRange> for ShardConfig {
    fn from(range: &LogRange) -> Self {
        Self {
            tree_id: range.tree_id,
            tree_length: range.tree_length,
            encoded_public_key: range.encoded_public_key.clone(),
        }
    }
}

/// An immutable view of the shard table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTable {
    inactive: Vec<LogRange>,
    active: i64,
}

impl RangeTable {
    /// Build a table, checking that lengths are non-negative and sum to at
    /// most `i64::MAX`, that tree ids are unique, and that the active tree is
    /// not among the inactive ones.
    pub fn new(inactive: Vec<LogRange>, active: i64) -> Result<Self> {
        let table = Self { inactive, active };
        table.check()?;
        Ok(table)
    }

    fn check(&self) -> Result<()> {
        let mut total: i64 = 0;
        for (i, range) in self.inactive.iter().enumerate() {
            if range.tree_length < 0 {
                return Err(ConfigError::NegativeLength {
                    tree_id: range.tree_id,
                    tree_length: range.tree_length,
                });
            }
            total = total
                .checked_add(range.tree_length)
                .ok_or(ConfigError::LengthOverflow(range.tree_id))?;
            if range.tree_id == self.active {
                return Err(ConfigError::ActiveTreeIsInactive(range.tree_id));
            }
            if self.inactive[..i].iter().any(|r| r.tree_id == range.tree_id) {
                return Err(ConfigError::DuplicateTreeId(range.tree_id));
            }
        }
        Ok(())
    }

    /// Map a global index to `(tree_id, local_index)`.
    ///
    /// Indexes past the inactive shards land in the active tree, so an index
    /// beyond the whole log still resolves to the active tree.
    pub fn resolve_virtual_index(&self, index: u64) -> (i64, u64) {
        let mut remaining = index;
        for range in &self.inactive {
            let length = range.length();
            if remaining < length {
                return (range.tree_id, remaining);
            }
            remaining -= length;
        }
        (self.active, remaining)
    }

    /// Sum of the inactive shard lengths.
    pub fn total_inactive_length(&self) -> i64 {
        self.inactive.iter().map(|r| r.tree_length).sum()
    }

    /// The public key to verify entries of `tree_id` with.
    ///
    /// `None` (or an empty id) and the active tree both answer
    /// `active_public_key`. An inactive shard answers its own key bytes,
    /// falling back to `active_public_key` when it has none.
    pub fn public_key(
        &self,
        active_public_key: impl AsRef<[u8]>,
        tree_id: Option<&str>,
    ) -> std::result::Result<Vec<u8>, LookupError> {
        let active_public_key = active_public_key.as_ref();
        let raw = match tree_id {
            None | Some("") => return Ok(active_public_key.to_vec()),
            Some(raw) => raw,
        };
        let tree_id: i64 = raw.parse().map_err(|source| LookupError::InvalidTreeId {
            value: raw.to_owned(),
            source,
        })?;

        if let Some(range) = self.inactive.iter().find(|r| r.tree_id == tree_id) {
            if range.decoded_public_key.is_empty() {
                return Ok(active_public_key.to_vec());
            }
            return Ok(range.decoded_public_key.clone());
        }
        if tree_id == self.active {
            return Ok(active_public_key.to_vec());
        }
        Err(LookupError::UnknownTreeId(tree_id))
    }

    pub fn inactive(&self) -> &[LogRange] {
        &self.inactive
    }

    pub fn active(&self) -> i64 {
        self.active
    }

    /// True when there are no inactive shards.
    pub fn no_inactive(&self) -> bool {
        self.inactive.is_empty()
    }
}

impl fmt::Display for RangeTable {
    /// `id=len,...,active=id`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for range in &self.inactive {
            write!(f, "{}={},", range.tree_id, range.tree_length)?;
        }
        write!(f, "active={}", self.active)
    }
}

/// A shard table shared between request handlers and an administrator.
#[derive(Debug, Default)]
pub struct LogRanges {
    table: RwLock<Arc<RangeTable>>,
}

impl LogRanges {
    /// Create a table from already-built shards.
    pub fn new(inactive: Vec<LogRange>, active: i64) -> Result<Self> {
        Ok(Self::from_table(RangeTable::new(inactive, active)?))
    }

    /// A table with no inactive shards.
    pub fn empty(active: i64) -> Self {
        Self::from_table(RangeTable {
            inactive: Vec::new(),
            active,
        })
    }

    fn from_table(table: RangeTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Load the table from a shard config.
    ///
    /// With no source the table has no inactive shards. A source requires a
    /// non-zero `active_tree_id`.
    pub fn load(source: Option<ShardSource>, active_tree_id: i64) -> Result<Self> {
        let Some(source) = source else {
            tracing::info!("No config file specified, skipping init of logRange map");
            return Ok(Self::empty(active_tree_id));
        };
        if active_tree_id == 0 {
            return Err(ConfigError::ZeroActiveTreeId);
        }

        let records = source.into_records()?;
        if records.is_empty() {
            tracing::info!("Shard config is empty, no inactive shards loaded");
            return Ok(Self::empty(active_tree_id));
        }

        let inactive = records
            .into_iter()
            .map(LogRange::try_from)
            .collect::<Result<Vec<_>>>()?;
        let ranges = Self::new(inactive, active_tree_id)?;
        tracing::info!(ranges = %ranges, "Loaded shard ranges");
        Ok(ranges)
    }

    /// The current table. Later updates do not affect a snapshot.
    pub fn snapshot(&self) -> Arc<RangeTable> {
        Arc::clone(&self.table.read())
    }

    pub fn resolve_virtual_index(&self, index: u64) -> (i64, u64) {
        self.snapshot().resolve_virtual_index(index)
    }

    pub fn total_inactive_length(&self) -> i64 {
        self.snapshot().total_inactive_length()
    }

    pub fn public_key(
        &self,
        active_public_key: impl AsRef<[u8]>,
        tree_id: Option<&str>,
    ) -> std::result::Result<Vec<u8>, LookupError> {
        self.snapshot().public_key(active_public_key, tree_id)
    }

    pub fn inactive(&self) -> Vec<LogRange> {
        self.snapshot().inactive.clone()
    }

    pub fn active(&self) -> i64 {
        self.snapshot().active
    }

    /// Alias of [`LogRanges::active`].
    pub fn active_tree_id(&self) -> i64 {
        self.active()
    }

    pub fn no_inactive(&self) -> bool {
        self.snapshot().no_inactive()
    }

    /// Replace the inactive shards.
    pub fn set_inactive(&self, inactive: Vec<LogRange>) -> Result<()> {
        self.update(|table| table.inactive = inactive)?;
        tracing::info!(ranges = %self, "Replaced inactive shards");
        Ok(())
    }

    /// Retire another shard after the existing inactive ones.
    pub fn append_inactive(&self, range: LogRange) -> Result<()> {
        let tree_id = range.tree_id;
        self.update(|table| table.inactive.push(range))?;
        tracing::info!(tree_id, "Appended inactive shard");
        Ok(())
    }

    /// Switch the active tree.
    pub fn set_active(&self, active: i64) -> Result<()> {
        self.update(|table| table.active = active)?;
        tracing::info!(active, "Set active tree");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut RangeTable)) -> Result<()> {
        let mut guard = self.table.write();
        let mut next = RangeTable::clone(&guard);
        apply(&mut next);
        next.check()?;
        *guard = Arc::new(next);
        Ok(())
    }
}

impl Clone for LogRanges {
    fn clone(&self) -> Self {
        Self {
            table: RwLock::new(self.snapshot()),
        }
    }
}

impl fmt::Display for LogRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.snapshot(), f)
    }
}
