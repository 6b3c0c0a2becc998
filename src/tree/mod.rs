mod builder;
mod index;
mod node;

pub use builder::TreeBuilder;
pub use node::{leaf_identity, FileNode, NodeKind};

use abst_fs::AbstPath;
use hasher::Hash;

use std::ops::{Index, IndexMut};

/// Handle to a slot of a [`Tree`] arena. Only meaningful for the tree that
/// handed it out, and only until the node is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);
impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of [`FileNode`]s. Slots of deleted nodes are recycled through a
/// free list, so a `NodeId` outlives its node only as a dangling handle:
/// indexing with it panics, [`Tree::get`] returns `None`
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Option<FileNode>>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Tree {
    /// Tree made of the single node `root`
    pub fn new(root: FileNode) -> Tree {
        Tree {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }
    pub fn root_digest(&self) -> &Hash {
        self[self.root].digest()
    }
    pub fn get(&self, id: NodeId) -> Option<&FileNode> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut FileNode> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }
    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children of `id` in canonical order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self.get(id).and_then(FileNode::first_child),
        }
    }
    /// Every live node in pre-order, children in canonical order
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Node at relative path `path`, descending from the root one component
    /// at a time
    pub fn find_by_path(&self, path: &AbstPath) -> Option<NodeId> {
        let mut current = self.root;
        let mut prefix = AbstPath::empty();
        for component in path {
            prefix = prefix.add_last(component);
            current = self.find_child(current, &prefix)?;
        }
        Some(current)
    }

    pub(crate) fn alloc(&mut self, node: FileNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Free `id` and all of its descendants. The caller is responsible for
    /// having unlinked `id` from its sibling chain; `id`'s own `next` is
    /// not followed
    pub(crate) fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = match self.slots.get_mut(current.0).and_then(Option::take) {
                Some(node) => node,
                None => continue,
            };
            self.free.push(current);
            let mut child = node.first_child;
            while let Some(child_id) = child {
                stack.push(child_id);
                child = self.get(child_id).and_then(FileNode::next);
            }
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = FileNode;

    fn index(&self, id: NodeId) -> &FileNode {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {} is not part of this tree", id.0),
        }
    }
}
impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut FileNode {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node {} is not part of this tree", id.0),
        }
    }
}

pub struct Children<'a> {
    tree: &'a Tree,
    cursor: Option<NodeId>,
}
impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.cursor?;
        self.cursor = self.tree.get(current).and_then(FileNode::next);
        Some(current)
    }
}

pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}
impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        let children: Vec<NodeId> = self.tree.children(current).collect();
        self.stack.extend(children.into_iter().rev());
        Some(current)
    }
}
