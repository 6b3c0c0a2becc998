mod effects;

pub use effects::{MetadataOnly, Mirror, SyncEffects};

use crate::error::{mismatch, Result};
use crate::tree::{NodeId, NodeKind, Tree};

use std::cmp::Ordering;
use tracing::debug;

/// What a synchronization changed in the target
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    /// Entries removed because the source does not have them (or has them
    /// with the other kind)
    pub removed: usize,
    /// Entries added because only the source has them
    pub created: usize,
    /// Files present on both sides whose identity changed
    pub refreshed: usize,
}

/// Make `target` equivalent to `source`, level by level. Every structural
/// change is reported to `effects` before being applied to `target`.
///
/// At each directory level the two sorted sibling chains are merged in a
/// single pass:
/// - a target child missing from the source, or present there with the
///   other kind, is removed
/// - a source child missing from the target is spliced in, files as copies
///   of the source leaf, directories empty and then filled recursively
/// - children on both sides are compared: files whose digests differ are
///   refreshed, directories are recursed into
///
/// Each directory digest is recomputed once, after its children are done.
pub fn reconcile<E: SyncEffects>(
    source: &Tree,
    target: &mut Tree,
    effects: &mut E,
) -> Result<SyncStats> {
    let mut stats = SyncStats::default();
    reconcile_dir(source, source.root(), target, target.root(), effects, &mut stats)?;
    Ok(stats)
}

enum Step {
    Create(NodeId),
    Remove(NodeId),
    Replace(NodeId, NodeId),
    Compare(NodeId, NodeId),
}

fn reconcile_dir<E: SyncEffects>(
    source: &Tree,
    source_dir: NodeId,
    target: &mut Tree,
    target_dir: NodeId,
    effects: &mut E,
    stats: &mut SyncStats,
) -> Result<()> {
    let parent_path = target[target_dir].path().clone();
    let source_children: Vec<NodeId> = source.children(source_dir).collect();
    if let Some(pair) = source_children
        .windows(2)
        .find(|pair| source[pair[0]].path() >= source[pair[1]].path())
    {
        return Err(mismatch(
            &parent_path,
            Some(source[pair[0]].path()),
            Some(source[pair[1]].path()),
        ));
    }

    let mut index = 0;
    let mut prev: Option<NodeId> = None;
    let mut cursor = target[target_dir].first_child();
    loop {
        if let (Some(prev), Some(current)) = (prev, cursor) {
            if target[prev].path() >= target[current].path() {
                return Err(mismatch(
                    &parent_path,
                    Some(target[prev].path()),
                    Some(target[current].path()),
                ));
            }
        }

        let step = match (source_children.get(index).copied(), cursor) {
            (None, None) => break,
            (Some(source_child), None) => Step::Create(source_child),
            (None, Some(target_child)) => Step::Remove(target_child),
            (Some(source_child), Some(target_child)) => {
                let (source_node, target_node) = (&source[source_child], &target[target_child]);
                match source_node.path().cmp(target_node.path()) {
                    Ordering::Less => Step::Create(source_child),
                    Ordering::Greater => Step::Remove(target_child),
                    Ordering::Equal if source_node.same_kind(target_node) => {
                        Step::Compare(source_child, target_child)
                    }
                    Ordering::Equal => Step::Replace(source_child, target_child),
                }
            }
        };

        match step {
            Step::Remove(target_child) => {
                cursor = remove(target, target_dir, prev, target_child, effects, stats)?;
            }
            Step::Create(source_child) => {
                let created =
                    create(source, source_child, target, target_dir, prev, effects, stats)?;
                prev = Some(created);
                index += 1;
            }
            Step::Replace(source_child, target_child) => {
                cursor = remove(target, target_dir, prev, target_child, effects, stats)?;
                let created =
                    create(source, source_child, target, target_dir, prev, effects, stats)?;
                prev = Some(created);
                index += 1;
            }
            Step::Compare(source_child, target_child) => {
                let source_node = &source[source_child];
                match source_node.kind() {
                    NodeKind::Dir => {
                        reconcile_dir(source, source_child, target, target_child, effects, stats)?;
                    }
                    NodeKind::File(mtime) => {
                        let target_node = &target[target_child];
                        if source_node.digest() != target_node.digest() {
                            debug!(
                                path = %source_node.path(),
                                from = %target_node.digest().to_hex(8),
                                to = %source_node.digest().to_hex(8),
                                "Refreshing file"
                            );
                            effects.copy_file(source_node.path(), mtime)?;
                            target.stamp_leaf(target_child, *mtime);
                            stats.refreshed += 1;
                        }
                    }
                }
                prev = Some(target_child);
                cursor = target[target_child].next();
                index += 1;
            }
        }
    }

    target.recompute_digest(target_dir)
}

/// Remove target child `id` (preceded by `prev`), returning its successor
fn remove<E: SyncEffects>(
    target: &mut Tree,
    target_dir: NodeId,
    prev: Option<NodeId>,
    id: NodeId,
    effects: &mut E,
    stats: &mut SyncStats,
) -> Result<Option<NodeId>> {
    let node = &target[id];
    debug!(path = %node.path(), is_dir = node.is_dir(), "Removing entry");
    effects.remove(node.path(), node.is_dir())?;
    stats.removed += 1;
    Ok(target.unlink_after(target_dir, prev, id))
}

/// Mirror source child `id` into the target right after `prev`, returning
/// the new target node
fn create<E: SyncEffects>(
    source: &Tree,
    id: NodeId,
    target: &mut Tree,
    target_dir: NodeId,
    prev: Option<NodeId>,
    effects: &mut E,
    stats: &mut SyncStats,
) -> Result<NodeId> {
    let node = &source[id];
    debug!(path = %node.path(), is_dir = node.is_dir(), "Creating entry");
    match node.kind() {
        NodeKind::Dir => effects.create_dir(node.path())?,
        NodeKind::File(mtime) => effects.copy_file(node.path(), mtime)?,
    }
    let created = target.link_after(target_dir, prev, node.mirror());
    stats.created += 1;

    if node.is_dir() {
        reconcile_dir(source, id, target, created, effects, stats)?;
    }
    Ok(created)
}
