use crate::config::SyncConfig;
use crate::error::{error_context, inerr, snperr, usgerr, Result};
use crate::exclude::ExcludeList;
use crate::snapshot::{self, Snapshot};
use crate::sync::{self, MetadataOnly, Mirror, SyncStats};
use crate::tree::{Tree, TreeBuilder};

use abst_fs::{self as fs, AbstPath};
use hasher::Hash;

use std::io::{Read, Write};
use tracing::{info, instrument};

/// Content-addressed view of a folder: the tree of its files and
/// directories, each carrying a digest that summarizes its whole subtree
#[derive(Debug, Clone)]
pub struct MerkleTree {
    folder: AbstPath,
    tree: Tree,
}

impl MerkleTree {
    pub fn build(folder: &AbstPath) -> Result<MerkleTree> {
        MerkleTree::build_with(folder, &ExcludeList::default())
    }
    pub fn build_with(folder: &AbstPath, exclude_list: &ExcludeList) -> Result<MerkleTree> {
        let tree = TreeBuilder::new(folder, exclude_list).build()?;
        Ok(MerkleTree {
            folder: folder.clone(),
            tree,
        })
    }
    pub fn build_configured(folder: &AbstPath, config: &SyncConfig) -> Result<MerkleTree> {
        MerkleTree::build_with(folder, &config.exclude_list()?)
    }

    pub fn folder(&self) -> &AbstPath {
        &self.folder
    }
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
    pub fn root_digest(&self) -> &Hash {
        self.tree.root_digest()
    }
    pub fn file_count(&self) -> u64 {
        self.tree[self.tree.root()].file_count()
    }

    /// Same content identity, regardless of the folders the trees describe
    pub fn is_equivalent(&self, other: &MerkleTree) -> bool {
        self.root_digest() == other.root_digest()
    }

    /// Bring `old` up to date with this tree, in memory only
    #[instrument(skip_all, fields(folder = %self.folder))]
    pub fn sync_metadata(&self, old: &mut MerkleTree) -> Result<SyncStats> {
        let stats = sync::reconcile(&self.tree, &mut old.tree, &mut MetadataOnly)?;
        info!(
            removed = stats.removed,
            created = stats.created,
            refreshed = stats.refreshed,
            root_digest = %old.root_digest().to_hex(8),
            "Metadata sync completed"
        );
        Ok(stats)
    }

    /// Make the folder of `dest` mirror the folder of this tree, updating
    /// `dest` along the way
    #[instrument(skip_all, fields(source = %self.folder, target = %dest.folder))]
    pub fn sync_filesystem(&self, dest: &mut MerkleTree) -> Result<SyncStats> {
        if self.folder == dest.folder {
            return Err(usgerr(
                format!("could not mirror folder {}", self.folder),
                "source and destination are the same folder",
            ));
        }

        let mut mirror = Mirror::new(&self.folder, &dest.folder);
        let stats = sync::reconcile(&self.tree, &mut dest.tree, &mut mirror)?;
        info!(
            removed = stats.removed,
            created = stats.created,
            refreshed = stats.refreshed,
            root_digest = %dest.root_digest().to_hex(8),
            "Filesystem sync completed"
        );
        Ok(stats)
    }

    /// Save a snapshot at `path`, encoded according to its extension
    /// (`.bin` or `.toml`)
    pub fn save(&self, path: &AbstPath) -> Result<()> {
        fs::save(path, &Snapshot::capture(&self.folder, &self.tree))
            .map_err(inerr(format!("could not save snapshot at path {path}")))?;
        info!(path = %path, nodes = self.tree.len(), "Snapshot saved");
        Ok(())
    }
    pub fn load(path: &AbstPath) -> Result<MerkleTree> {
        let errctx = error_context(format!("could not load snapshot at path {path}"));
        let snapshot: Snapshot = fs::load(path).map_err(|err| snperr(errctx("decode snapshot"), err))?;
        let merkle_tree = MerkleTree::from_snapshot(snapshot)?;
        info!(
            path = %path,
            nodes = merkle_tree.tree.len(),
            root_digest = %merkle_tree.root_digest().to_hex(8),
            "Snapshot loaded"
        );
        Ok(merkle_tree)
    }

    pub fn save_to<W: Write>(&self, writer: W) -> Result<()> {
        snapshot::save(&Snapshot::capture(&self.folder, &self.tree), writer)
    }
    pub fn load_from<R: Read>(reader: R) -> Result<MerkleTree> {
        MerkleTree::from_snapshot(snapshot::load(reader)?)
    }

    fn from_snapshot(snapshot: Snapshot) -> Result<MerkleTree> {
        let (folder, tree) = snapshot.restore()?;
        Ok(MerkleTree { folder, tree })
    }
}
