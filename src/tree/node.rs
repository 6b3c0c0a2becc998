use super::NodeId;

use abst_fs::{AbstPath, Mtime};
use hasher::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File(Mtime),
    Dir,
}

/// One file or directory of a tree.
///
/// Linkage fields are arena indices: a node owns its children through
/// `first_child` and the chain of `next` siblings, while `parent` is only a
/// back-reference used to walk up when digests have to be refreshed.
#[derive(Debug, Clone)]
pub struct FileNode {
    pub(crate) kind: NodeKind,
    pub(crate) identity: Vec<u8>,
    pub(crate) path: AbstPath,
    pub(crate) digest: Hash,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) file_count: u64,
}

/// Identity input of a file: `"<mtime in nanoseconds>|<relative path>"`
pub fn leaf_identity(mtime: &Mtime, path: &AbstPath) -> Vec<u8> {
    format!("{}|{}", mtime.as_nanos(), path).into_bytes()
}

impl FileNode {
    /// Unlinked file node
    pub fn leaf(path: AbstPath, mtime: Mtime) -> FileNode {
        let identity = leaf_identity(&mtime, &path);
        FileNode {
            kind: NodeKind::File(mtime),
            digest: hasher::hash_bytes(&identity),
            identity,
            path,
            parent: None,
            first_child: None,
            next: None,
            file_count: 1,
        }
    }
    /// Unlinked, empty directory node
    pub fn directory(path: AbstPath) -> FileNode {
        FileNode {
            kind: NodeKind::Dir,
            identity: Vec::new(),
            digest: hasher::empty_digest(),
            path,
            parent: None,
            first_child: None,
            next: None,
            file_count: 0,
        }
    }
    /// Unlinked node of the same kind and path. Files keep their mtime (and
    /// so their digest); directories come out empty
    pub fn mirror(&self) -> FileNode {
        match self.kind {
            NodeKind::File(mtime) => FileNode::leaf(self.path.clone(), mtime),
            NodeKind::Dir => FileNode::directory(self.path.clone()),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File(_))
    }
    pub fn mtime(&self) -> Option<Mtime> {
        match self.kind {
            NodeKind::File(mtime) => Some(mtime),
            NodeKind::Dir => None,
        }
    }
    pub fn same_kind(&self, other: &FileNode) -> bool {
        self.is_dir() == other.is_dir()
    }
    pub fn identity(&self) -> &[u8] {
        &self.identity
    }
    pub fn path(&self) -> &AbstPath {
        &self.path
    }
    pub fn digest(&self) -> &Hash {
        &self.digest
    }
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
    /// Number of files in the subtree rooted here (1 for a file)
    pub fn file_count(&self) -> u64 {
        self.file_count
    }
}
