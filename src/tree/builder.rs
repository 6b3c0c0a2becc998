use super::{FileNode, NodeId, Tree};
use crate::error::{error_context, inerr, usgerr, Result};
use crate::exclude::ExcludeList;

use abst_fs::{self as fs, AbstPath, ObjectType};

use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Builds a [`Tree`] mirroring the content of a folder on disk
pub struct TreeBuilder<'a> {
    folder: &'a AbstPath,
    exclude_list: &'a ExcludeList,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(folder: &'a AbstPath, exclude_list: &'a ExcludeList) -> TreeBuilder<'a> {
        TreeBuilder {
            folder,
            exclude_list,
        }
    }

    /// Walk the folder and build its tree. Children are linked in canonical
    /// order and every directory digest is computed once its subtree is done.
    /// Symlinks, special files and names that are not valid UTF-8 are left out
    #[instrument(skip(self), fields(folder = %self.folder))]
    pub fn build(&self) -> Result<Tree> {
        let errctx = error_context(format!("could not build tree of folder {}", self.folder));
        if self.folder.object_type() != Some(ObjectType::Dir) {
            return Err(usgerr(errctx("open folder"), "path is not a directory"));
        }

        let start = Instant::now();
        let mut tree = Tree::new(FileNode::directory(AbstPath::empty()));
        let root = tree.root();
        self.build_dir(&mut tree, root)?;

        info!(
            node_count = tree.len(),
            file_count = tree[root].file_count(),
            root_digest = %tree.root_digest().to_hex(8),
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );
        Ok(tree)
    }

    fn build_dir(&self, tree: &mut Tree, dir: NodeId) -> Result<()> {
        let rel_path = tree[dir].path().clone();
        let path = self.folder.append(&rel_path);
        let errctx = error_context(format!("could not build subtree at path {path}"));

        let content =
            fs::list_dir_content(&path).map_err(inerr(errctx("list content of dir")))?;
        for name in &content.non_utf8 {
            debug!(dir = %path, name = ?name, "Skipping entry with a non UTF-8 name");
        }
        let mut entries: Vec<(AbstPath, AbstPath)> = content
            .entries
            .into_iter()
            .filter_map(|entry| Some((rel_path.add_last(entry.file_name()?), entry)))
            .collect();
        entries.sort_by(|(rel0, _), (rel1, _)| rel0.cmp(rel1));

        let mut last: Option<NodeId> = None;
        for (rel_subpath, entry) in entries {
            let object_type = match entry.object_type() {
                Some(object_type) => object_type,
                None => {
                    debug!(path = %rel_subpath, "Entry vanished while listing, skipping");
                    continue;
                }
            };
            if self
                .exclude_list
                .should_exclude(&rel_subpath, object_type == ObjectType::Dir)
            {
                trace!(path = %rel_subpath, "Excluded");
                continue;
            }

            let node = match object_type {
                ObjectType::Dir => FileNode::directory(rel_subpath),
                ObjectType::File => {
                    let mtime = fs::get_mtime(&entry).map_err(inerr(errctx(
                        format!("get mtime of file at path {entry}").as_str(),
                    )))?;
                    FileNode::leaf(rel_subpath, mtime)
                }
                ObjectType::SymLink | ObjectType::Other => {
                    debug!(path = %rel_subpath, kind = %object_type, "Skipping unsupported entry");
                    continue;
                }
            };
            let is_dir = node.is_dir();
            trace!(path = %node.path(), is_dir, "Adding entry");

            let child = tree.link_after(dir, last, node);
            last = Some(child);

            if is_dir {
                self.build_dir(tree, child)?;
            }
        }

        tree.recompute_digest(dir)
    }
}
