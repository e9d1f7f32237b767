//! # Treehead Shard
//!
//! Shard bookkeeping for a log split across several trees: which tree holds a
//! global index, and which public key verifies each tree.
//!
//! ```rust
//! use treehead_shard::{LogRanges, ShardSource};
//!
//! let yaml = b"- treeID: 1\n  treeLength: 5\n- treeID: 2\n  treeLength: 3\n".to_vec();
//! let ranges = LogRanges::load(Some(ShardSource::Yaml(yaml)), 3).unwrap();
//!
//! assert_eq!(ranges.resolve_virtual_index(6), (2, 1));
//! assert_eq!(ranges.to_string(), "1=5,2=3,active=3");
//! ```

pub mod config;
pub mod error;
pub mod ranges;

pub use config::{parse_yaml, ShardConfig, ShardSource};
pub use error::{ConfigError, LookupError, Result};
pub use ranges::{LogRange, LogRanges, RangeTable};
