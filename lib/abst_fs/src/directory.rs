use super::{error_context, inerr, wrgobj, AbstPath, Error, ObjectType};

use std::ffi::OsString;

/// Create a directory if it doesn't exist, creating missing ancestors too
pub fn create_dir(path: &AbstPath) -> Result<(), Error> {
    let errctx = error_context(format!("could not create directory at path {path}"));
    match path.object_type() {
        Some(ObjectType::Dir) => Ok(()),
        None => {
            std::fs::create_dir_all(path.to_path_buf()).map_err(inerr(errctx("create directory")))
        }
        Some(_) => Err(wrgobj(errctx("create directory"), ObjectType::Dir, path)),
    }
}

/// Make sure the directory that would contain `path` exists
pub fn ensure_parent(path: &AbstPath) -> Result<(), Error> {
    let errctx = error_context(format!("could not ensure parent directory of path {path}"));
    match path.parent() {
        Some(parent) if !parent.exists() => {
            create_dir(&parent).map_err(inerr(errctx("create parent")))
        }
        _ => Ok(()),
    }
}

/// Content of a directory, in whatever order the OS yields it
#[derive(Debug, Default, PartialEq)]
pub struct DirContent {
    /// Full paths of the entries whose names are valid UTF-8
    pub entries: Vec<AbstPath>,
    /// Names that could not be represented as an `AbstPath`
    pub non_utf8: Vec<OsString>,
}

/// List the direct entries of a directory
pub fn list_dir_content(path: &AbstPath) -> Result<DirContent, Error> {
    let errctx = error_context(format!("could not list content of dir at path {path}"));
    if path.object_type() != Some(ObjectType::Dir) {
        return Err(wrgobj(errctx("read dir"), ObjectType::Dir, path));
    }

    let mut content = DirContent::default();
    let entries = std::fs::read_dir(path.to_path_buf()).map_err(inerr(errctx("read dir")))?;
    for entry in entries {
        let entry = entry.map_err(inerr(errctx("retrieve value of entry")))?;
        match entry.file_name().into_string() {
            Ok(name) => content.entries.push(path.add_last(name)),
            Err(name) => content.non_utf8.push(name),
        }
    }

    Ok(content)
}

/// Remove a directory together with everything it contains
pub fn remove_dir_all(path: &AbstPath) -> Result<(), Error> {
    let errctx = error_context(format!("could not forcefully remove directory at path {path}"));
    if path.object_type() != Some(ObjectType::Dir) {
        return Err(wrgobj(errctx("remove directory"), ObjectType::Dir, path));
    }
    std::fs::remove_dir_all(path.to_path_buf()).map_err(inerr(errctx("remove directory")))
}

#[cfg(test)]
mod tests {
    use super::{
        create_dir, ensure_parent, list_dir_content, remove_dir_all, AbstPath, DirContent, ObjectType,
    };

    #[test]
    fn create_and_list() {
        let sandbox = tempfile::TempDir::new().unwrap();
        let root = AbstPath::from(sandbox.path());

        let dir = root.add_last("nested").add_last("dir");
        assert!(!dir.exists());
        create_dir(&dir).unwrap();
        assert_eq!(dir.object_type(), Some(ObjectType::Dir));
        // already there
        create_dir(&dir).unwrap();

        assert_eq!(list_dir_content(&dir).unwrap(), DirContent::default());

        std::fs::File::create(dir.add_last("file1.txt").to_path_buf()).unwrap();
        create_dir(&dir.add_last("sub")).unwrap();
        let mut listed = list_dir_content(&dir).unwrap().entries;
        listed.sort();
        assert_eq!(listed, vec![dir.add_last("file1.txt"), dir.add_last("sub")]);

        let file = dir.add_last("file1.txt");
        assert!(create_dir(&file).is_err());
        assert!(list_dir_content(&file).is_err());
        assert!(list_dir_content(&root.add_last("missing")).is_err());
    }

    #[test]
    fn parent_and_removal() {
        let sandbox = tempfile::TempDir::new().unwrap();
        let root = AbstPath::from(sandbox.path());

        let child = root.add_last("a").add_last("b").add_last("file.txt");
        ensure_parent(&child).unwrap();
        assert_eq!(
            root.add_last("a").add_last("b").object_type(),
            Some(ObjectType::Dir)
        );
        assert!(!child.exists());

        std::fs::write(child.to_path_buf(), b"content").unwrap();
        assert!(remove_dir_all(&child).is_err());
        remove_dir_all(&root.add_last("a")).unwrap();
        assert!(!root.add_last("a").exists());
        assert!(remove_dir_all(&root.add_last("a")).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_reported_apart() {
        use std::os::unix::ffi::OsStrExt;

        let sandbox = tempfile::TempDir::new().unwrap();
        let root = AbstPath::from(sandbox.path());
        let name = std::ffi::OsStr::from_bytes(b"bad\xffname");
        std::fs::write(sandbox.path().join(name), b"x").unwrap();
        std::fs::write(sandbox.path().join("good"), b"x").unwrap();

        let content = list_dir_content(&root).unwrap();
        assert_eq!(content.entries, vec![root.add_last("good")]);
        assert_eq!(content.non_utf8, vec![name.to_os_string()]);
    }
}
