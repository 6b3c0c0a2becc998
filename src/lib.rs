//! Merkle trees of directories.
//!
//! A [`MerkleTree`] mirrors a folder: every file and directory gets a digest,
//! files from their modification time and relative path, directories from
//! the digests of their children in canonical order. Two trees describe the
//! same content iff their root digests match, and a stale tree (or a whole
//! folder on disk) can be brought in line with a fresh one by touching only
//! the entries that differ.

pub mod config;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod merkle;
pub mod snapshot;
pub mod sync;
pub mod tree;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use exclude::{ExcludeList, ExcludeListError};
pub use logging::{init_logging, LoggingConfig};
pub use merkle::MerkleTree;
pub use snapshot::{Snapshot, SnapshotNode};
pub use sync::{MetadataOnly, Mirror, SyncEffects, SyncStats};
pub use tree::{FileNode, NodeId, NodeKind, Tree, TreeBuilder};
