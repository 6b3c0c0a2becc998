use crate::error::{error_context, inerr, snperr, Result};
use crate::tree::{FileNode, NodeId, NodeKind, Tree};

use abst_fs::{AbstPath, Mtime};
use hasher::Hash;

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Persisted form of a node. Files carry `mtime` and no `children`,
/// directories the opposite. Parent links are not stored
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SnapshotNode {
    pub rel_path: AbstPath,
    pub identity: Vec<u8>,
    pub digest: Hash,
    pub file_count: u64,
    pub mtime: Option<Mtime>,
    pub children: Option<Vec<SnapshotNode>>,
}

/// Persisted form of a whole tree, together with the folder it describes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Snapshot {
    pub folder: AbstPath,
    pub root: SnapshotNode,
}

impl SnapshotNode {
    fn capture(tree: &Tree, id: NodeId) -> SnapshotNode {
        let node = &tree[id];
        let children = match node.kind() {
            NodeKind::File(_) => None,
            NodeKind::Dir => Some(
                tree.children(id)
                    .map(|child| SnapshotNode::capture(tree, child))
                    .collect(),
            ),
        };
        SnapshotNode {
            rel_path: node.path().clone(),
            identity: node.identity().to_vec(),
            digest: *node.digest(),
            file_count: node.file_count(),
            mtime: node.mtime(),
            children,
        }
    }

    /// Unlinked node plus the records of its children (if a directory)
    fn into_node(self) -> Result<(FileNode, Option<Vec<SnapshotNode>>)> {
        let errctx = error_context(format!("could not restore node at path {}", self.rel_path));
        let (kind, children) = match (self.mtime, self.children) {
            (Some(mtime), None) => (NodeKind::File(mtime), None),
            (None, Some(children)) => (NodeKind::Dir, Some(children)),
            _ => {
                return Err(snperr(
                    errctx("determine node kind"),
                    "node must have either a modification time or a list of children",
                ))
            }
        };
        let node = FileNode {
            kind,
            identity: self.identity,
            path: self.rel_path,
            digest: self.digest,
            parent: None,
            first_child: None,
            next: None,
            file_count: self.file_count,
        };
        Ok((node, children))
    }
}

impl Snapshot {
    pub fn capture(folder: &AbstPath, tree: &Tree) -> Snapshot {
        Snapshot {
            folder: folder.clone(),
            root: SnapshotNode::capture(tree, tree.root()),
        }
    }

    /// Rebuild the tree described by the snapshot, linking every node to
    /// its parent. Returns the folder the tree was built from
    pub fn restore(self) -> Result<(AbstPath, Tree)> {
        let errctx = error_context(format!("could not restore snapshot of folder {}", self.folder));
        let (root, root_children) = self.root.into_node()?;
        if !root.is_dir() || !root.path().is_empty() {
            return Err(snperr(
                errctx("restore root"),
                "root must be a directory with an empty relative path",
            ));
        }

        let mut tree = Tree::new(root);
        let mut worklist: Vec<(NodeId, Vec<SnapshotNode>)> =
            vec![(tree.root(), root_children.unwrap_or_default())];
        while let Some((parent, records)) = worklist.pop() {
            let parent_path = tree[parent].path().clone();
            let mut last: Option<NodeId> = None;
            for record in records {
                let (node, children) = record.into_node()?;
                if node.path().len() != parent_path.len() + 1
                    || node.path().strip_last() != parent_path
                {
                    return Err(snperr(
                        errctx("link node to its parent"),
                        format!("{} is not a direct child of {}", node.path(), parent_path),
                    ));
                }
                if let Some(last) = last {
                    if tree[last].path() >= node.path() {
                        return Err(snperr(
                            errctx("link node to its siblings"),
                            format!("{} is out of order after {}", node.path(), tree[last].path()),
                        ));
                    }
                }

                let id = tree.link_after(parent, last, node);
                last = Some(id);

                if let Some(children) = children {
                    worklist.push((id, children));
                }
            }
        }

        Ok((self.folder, tree))
    }
}

/// Write `snapshot` to `writer` in binary form
pub fn save<W: Write>(snapshot: &Snapshot, writer: W) -> Result<()> {
    bincode::serialize_into(writer, snapshot).map_err(inerr(format!(
        "could not serialize snapshot of folder {}",
        snapshot.folder
    )))
}

/// Read a snapshot in binary form from `reader`
pub fn load<R: Read>(reader: R) -> Result<Snapshot> {
    bincode::deserialize_from(reader)
        .map_err(|err| snperr("could not deserialize snapshot from stream", err))
}

#[cfg(test)]
mod tests {
    use super::{load, save, Snapshot};
    use crate::error::Error;
    use crate::tree::{FileNode, Tree};
    use abst_fs::{AbstPath, Mtime};

    fn sample() -> Tree {
        let mut tree = Tree::new(FileNode::directory(AbstPath::empty()));
        let root = tree.root();
        tree.insert(FileNode::leaf(AbstPath::from("a.txt"), Mtime::from(1, 0)), root)
            .unwrap();
        let d = tree.insert(FileNode::directory(AbstPath::from("d")), root).unwrap();
        tree.insert(FileNode::leaf(AbstPath::from("d/b.txt"), Mtime::from(2, 0)), d)
            .unwrap();
        tree.insert(FileNode::directory(AbstPath::from("d/e")), d).unwrap();
        tree
    }

    #[test]
    fn stream_round_trip_restores_parents() {
        let tree = sample();
        let folder = AbstPath::from("/some/folder");
        let mut buffer: Vec<u8> = Vec::new();
        save(&Snapshot::capture(&folder, &tree), &mut buffer).unwrap();

        let (restored_folder, restored) = load(buffer.as_slice()).unwrap().restore().unwrap();
        assert_eq!(restored_folder, folder);
        assert_eq!(restored.len(), tree.len());
        assert_eq!(restored.root_digest(), tree.root_digest());

        for id in restored.iter() {
            let node = &restored[id];
            let original = &tree[tree.find_by_path(node.path()).unwrap()];
            assert_eq!(node.digest(), original.digest());
            assert_eq!(node.identity(), original.identity());
            assert_eq!(node.file_count(), original.file_count());
            assert_eq!(node.mtime(), original.mtime());
            match node.parent() {
                Some(parent) => assert_eq!(restored[parent].path(), &node.path().strip_last()),
                None => assert_eq!(id, restored.root()),
            }
        }
    }

    #[test]
    fn restored_tree_is_mutable() {
        let tree = sample();
        let (_, mut restored) = Snapshot::capture(&AbstPath::empty(), &tree)
            .restore()
            .unwrap();
        let b = restored.find_by_path(&AbstPath::from("d/b.txt")).unwrap();
        restored.set_leaf_identity(b, Mtime::from(3, 0)).unwrap();

        let d = restored.find_by_path(&AbstPath::from("d")).unwrap();
        let children: Vec<_> = restored.children(restored.root()).collect();
        assert_eq!(
            restored.root_digest(),
            &hasher::hash_concat(children.iter().map(|&id| restored[id].digest()))
        );
        assert_ne!(restored[d].digest(), tree[tree.find_by_path(&AbstPath::from("d")).unwrap()].digest());
    }

    #[test]
    fn rejects_unordered_siblings() {
        let mut snapshot = Snapshot::capture(&AbstPath::empty(), &sample());
        if let Some(children) = snapshot.root.children.as_mut() {
            children.reverse();
        }
        assert!(matches!(snapshot.restore(), Err(Error::Snapshot { .. })));
    }

    #[test]
    fn rejects_inconsistent_kind() {
        let mut snapshot = Snapshot::capture(&AbstPath::empty(), &sample());
        if let Some(children) = snapshot.root.children.as_mut() {
            children[0].children = Some(Vec::new());
        }
        assert!(matches!(snapshot.restore(), Err(Error::Snapshot { .. })));
    }

    #[test]
    fn rejects_misplaced_child() {
        let mut snapshot = Snapshot::capture(&AbstPath::empty(), &sample());
        if let Some(children) = snapshot.root.children.as_mut() {
            children[0].rel_path = AbstPath::from("elsewhere/a.txt");
        }
        assert!(matches!(snapshot.restore(), Err(Error::Snapshot { .. })));
    }

    #[test]
    fn rejects_garbage() {
        let garbage = [0xffu8; 7];
        assert!(matches!(load(&garbage[..]), Err(Error::Snapshot { .. })));
    }
}
