use super::{leaf_identity, FileNode, NodeId, NodeKind, Tree};
use crate::error::{error_context, usgerr, Result};

use abst_fs::{AbstPath, Mtime};

use std::cmp::Ordering;

impl Tree {
    /// Child of `parent` whose relative path is `path`
    pub fn find_child(&self, parent: NodeId, path: &AbstPath) -> Option<NodeId> {
        self.children(parent).find(|&child| self[child].path() == path)
    }

    /// Link `node` under `parent` keeping the sibling chain in canonical
    /// order, then refresh every ancestor up to the root
    pub fn insert(&mut self, node: FileNode, parent: NodeId) -> Result<NodeId> {
        let errctx = error_context(format!("could not insert node at path {}", node.path()));
        self.expect_dir(parent, &errctx)?;

        let mut prev: Option<NodeId> = None;
        let mut cursor = self[parent].first_child();
        while let Some(current) = cursor {
            match self[current].path().cmp(node.path()) {
                Ordering::Less => {
                    prev = Some(current);
                    cursor = self[current].next();
                }
                Ordering::Equal => {
                    return Err(usgerr(
                        errctx("find insertion point"),
                        "a sibling with the same path already exists",
                    ));
                }
                Ordering::Greater => break,
            }
        }

        let id = self.link_after(parent, prev, node);
        self.propagate(parent)?;
        Ok(id)
    }

    /// Unlink and free the child of `parent` at `path`, together with its
    /// whole subtree. Returns whether such a child existed
    pub fn delete(&mut self, parent: NodeId, path: &AbstPath) -> Result<bool> {
        let errctx = error_context(format!("could not delete node at path {}", path));
        self.expect_dir(parent, &errctx)?;

        let mut prev: Option<NodeId> = None;
        let mut cursor = self[parent].first_child();
        while let Some(current) = cursor {
            match self[current].path().cmp(path) {
                Ordering::Less => {
                    prev = Some(current);
                    cursor = self[current].next();
                }
                Ordering::Equal => {
                    self.unlink_after(parent, prev, current);
                    self.propagate(parent)?;
                    return Ok(true);
                }
                Ordering::Greater => break,
            }
        }
        Ok(false)
    }

    /// Rebuild the identity, digest and file count of directory `dir` from
    /// its current children. Ancestors are left untouched
    pub fn recompute_digest(&mut self, dir: NodeId) -> Result<()> {
        let errctx = error_context(format!("could not recompute digest of node {}", dir.index()));
        self.expect_dir(dir, &errctx)?;

        let mut identity = Vec::with_capacity(hasher::HASH_LEN * 4);
        let mut file_count = 0;
        for child in self.children(dir) {
            let child = &self[child];
            identity.extend_from_slice(child.digest().as_bytes());
            file_count += child.file_count();
        }

        let node = &mut self[dir];
        node.digest = hasher::hash_bytes(&identity);
        node.identity = identity;
        node.file_count = file_count;
        Ok(())
    }

    /// Stamp file `id` with a new modification time, then refresh every
    /// ancestor up to the root
    pub fn set_leaf_identity(&mut self, id: NodeId, mtime: Mtime) -> Result<()> {
        let errctx = error_context(format!("could not update identity of node {}", id.index()));
        let node = self
            .get_mut(id)
            .ok_or_else(|| usgerr(errctx("find node"), "node is not part of this tree"))?;
        if node.is_dir() {
            return Err(usgerr(
                errctx("update identity"),
                format!("{} is a directory", node.path()),
            ));
        }

        let parent = node.parent();
        self.stamp_leaf(id, mtime);
        match parent {
            Some(parent) => self.propagate(parent),
            None => Ok(()),
        }
    }

    /// Link `node` under `parent` right after sibling `prev` (as first child
    /// when `None`). Neither order nor digests are checked
    pub(crate) fn link_after(
        &mut self,
        parent: NodeId,
        prev: Option<NodeId>,
        mut node: FileNode,
    ) -> NodeId {
        let next = match prev {
            Some(prev) => self[prev].next(),
            None => self[parent].first_child(),
        };
        node.parent = Some(parent);
        node.first_child = None;
        node.next = next;
        let id = self.alloc(node);
        match prev {
            Some(prev) => self[prev].next = Some(id),
            None => self[parent].first_child = Some(id),
        }
        id
    }

    /// Unlink child `id` of `parent`, whose preceding sibling is `prev`, and
    /// free its subtree. Returns the sibling that followed it. Digests are
    /// not refreshed
    pub(crate) fn unlink_after(
        &mut self,
        parent: NodeId,
        prev: Option<NodeId>,
        id: NodeId,
    ) -> Option<NodeId> {
        let next = self[id].next();
        match prev {
            Some(prev) => self[prev].next = next,
            None => self[parent].first_child = next,
        }
        self.release_subtree(id);
        next
    }

    /// Set the identity of file `id` from `mtime`, ancestors untouched
    pub(crate) fn stamp_leaf(&mut self, id: NodeId, mtime: Mtime) {
        let node = &mut self[id];
        node.identity = leaf_identity(&mtime, node.path());
        node.digest = hasher::hash_bytes(&node.identity);
        node.kind = NodeKind::File(mtime);
    }

    fn propagate(&mut self, from: NodeId) -> Result<()> {
        let mut current = Some(from);
        while let Some(id) = current {
            self.recompute_digest(id)?;
            current = self[id].parent();
        }
        Ok(())
    }

    fn expect_dir(&self, id: NodeId, errctx: &impl Fn(&str) -> String) -> Result<()> {
        match self.get(id) {
            None => Err(usgerr(errctx("find parent"), "node is not part of this tree")),
            Some(node) if !node.is_dir() => Err(usgerr(
                errctx("use node as parent"),
                format!("{} is not a directory", node.path()),
            )),
            Some(_) => Ok(()),
        }
    }
}
