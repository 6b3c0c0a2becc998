use crate::error::{error_context, inerr, Result};

use abst_fs::{self as fs, AbstPath, Mtime};

/// Side effects of a synchronization, applied as the engine mutates the
/// target tree. Paths are relative to the tree folders
pub trait SyncEffects {
    /// `path` is being removed from the target
    fn remove(&mut self, path: &AbstPath, is_dir: bool) -> Result<()>;
    /// An empty directory `path` is being added to the target
    fn create_dir(&mut self, path: &AbstPath) -> Result<()>;
    /// File `path` of the source, last modified at `mtime`, is being
    /// added to or refreshed in the target
    fn copy_file(&mut self, path: &AbstPath, mtime: &Mtime) -> Result<()>;
}

/// Only the target tree changes
pub struct MetadataOnly;
impl SyncEffects for MetadataOnly {
    fn remove(&mut self, _path: &AbstPath, _is_dir: bool) -> Result<()> {
        Ok(())
    }
    fn create_dir(&mut self, _path: &AbstPath) -> Result<()> {
        Ok(())
    }
    fn copy_file(&mut self, _path: &AbstPath, _mtime: &Mtime) -> Result<()> {
        Ok(())
    }
}

/// The target folder on disk is made to mirror the source folder
pub struct Mirror<'a> {
    source_root: &'a AbstPath,
    target_root: &'a AbstPath,
}
impl<'a> Mirror<'a> {
    pub fn new(source_root: &'a AbstPath, target_root: &'a AbstPath) -> Mirror<'a> {
        Mirror {
            source_root,
            target_root,
        }
    }
}
impl<'a> SyncEffects for Mirror<'a> {
    fn remove(&mut self, path: &AbstPath, is_dir: bool) -> Result<()> {
        let target = self.target_root.append(path);
        let errctx = error_context(format!("could not remove path {target}"));
        match is_dir {
            true => fs::remove_dir_all(&target).map_err(inerr(errctx("remove directory"))),
            false => fs::remove_file(&target).map_err(inerr(errctx("remove file"))),
        }
    }
    fn create_dir(&mut self, path: &AbstPath) -> Result<()> {
        let target = self.target_root.append(path);
        fs::create_dir(&target).map_err(inerr(format!("could not create directory at path {target}")))
    }
    fn copy_file(&mut self, path: &AbstPath, mtime: &Mtime) -> Result<()> {
        let source = self.source_root.append(path);
        let target = self.target_root.append(path);
        let errctx = error_context(format!("could not mirror file {source} to {target}"));
        fs::copy_file(&source, &target).map_err(inerr(errctx("copy content")))?;
        fs::set_mtime(&target, mtime).map_err(inerr(errctx("stamp modification time")))
    }
}

#[cfg(test)]
mod tests {
    use super::{Mirror, SyncEffects};
    use abst_fs::{AbstPath, Mtime};

    #[test]
    fn mirror_effects() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let source_root = AbstPath::from(source.path());
        let target_root = AbstPath::from(target.path());
        std::fs::create_dir(source.path().join("d")).unwrap();
        std::fs::write(source.path().join("d/f.txt"), "content").unwrap();

        let mut mirror = Mirror::new(&source_root, &target_root);
        mirror.create_dir(&AbstPath::from("d")).unwrap();
        assert!(target.path().join("d").is_dir());

        let mtime = Mtime::from(1_234_567, 890);
        mirror.copy_file(&AbstPath::from("d/f.txt"), &mtime).unwrap();
        let copied = AbstPath::from(target.path().join("d/f.txt"));
        assert_eq!(std::fs::read_to_string(copied.to_path_buf()).unwrap(), "content");
        assert_eq!(abst_fs::get_mtime(&copied).unwrap(), mtime);

        mirror.remove(&AbstPath::from("d/f.txt"), false).unwrap();
        assert!(!copied.exists());
        mirror.remove(&AbstPath::from("d"), true).unwrap();
        assert!(!target.path().join("d").exists());
    }

    #[test]
    fn mirror_remove_refuses_wrong_kind() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let source_root = AbstPath::from(source.path());
        let target_root = AbstPath::from(target.path());
        std::fs::create_dir(target.path().join("d")).unwrap();

        let mut mirror = Mirror::new(&source_root, &target_root);
        assert!(mirror.remove(&AbstPath::from("d"), false).is_err());
        assert!(target.path().join("d").is_dir());
    }
}
