use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ObjectType {
    File,
    SymLink,
    Dir,
    /// Anything else the OS can put in a directory (sockets, fifos, devices)
    Other,
}
impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectType::File => "a file",
            ObjectType::SymLink => "a symlink",
            ObjectType::Dir => "a directory",
            ObjectType::Other => "a foreign object",
        };
        write!(f, "{}", name)
    }
}

/// Path stored as its list of components.
///
/// Ordering is component-wise lexicographic, so two paths that share a parent
/// compare exactly like their file names do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AbstPath(Vec<String>);
impl AbstPath {
    pub fn empty() -> AbstPath {
        AbstPath(Vec::new())
    }
    pub fn single<S: std::string::ToString>(component: S) -> AbstPath {
        AbstPath(vec![component.to_string()])
    }
    /// Build from an OS path. Components that are not valid UTF-8 are
    /// converted lossily; use [`AbstPath::try_from_path`] when that matters
    pub fn from<T: AsRef<Path>>(path: T) -> AbstPath {
        let components = path
            .as_ref()
            .components()
            .map(|comp| comp.as_os_str().to_string_lossy().into_owned())
            .collect();
        AbstPath(components)
    }
    pub fn try_from_path<T: AsRef<Path>>(path: T) -> Option<AbstPath> {
        let mut components = Vec::new();
        for comp in path.as_ref().components() {
            components.push(comp.as_os_str().to_str()?.to_string());
        }
        Some(AbstPath(components))
    }
    pub fn to_path_buf(&self) -> PathBuf {
        let AbstPath(components) = self;
        PathBuf::from_iter(components)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add_last<S: std::string::ToString>(&self, suffix: S) -> AbstPath {
        let AbstPath(mut components) = self.clone();
        components.push(suffix.to_string());
        AbstPath(components)
    }
    pub fn strip_last(&self) -> AbstPath {
        let AbstPath(mut components) = self.clone();
        components.pop();
        AbstPath(components)
    }
    pub fn append(&self, AbstPath(appendix): &AbstPath) -> AbstPath {
        let AbstPath(mut components) = self.clone();
        components.extend(appendix.iter().cloned());
        AbstPath(components)
    }

    pub fn parent(&self) -> Option<AbstPath> {
        // Defer to std so that roots and prefixes ("/", "c:") are not treated
        //	as regular components
        Some(AbstPath::from(self.to_path_buf().parent()?))
    }
    pub fn file_name(&self) -> Option<&str> {
        let AbstPath(components) = self;
        components.last().map(String::as_str)
    }
    pub fn extension(&self) -> Option<&str> {
        let last = self.file_name()?;
        let ext = &last[last.rfind('.')? + 1..];
        match ext.is_empty() {
            true => None,
            false => Some(ext),
        }
    }

    pub fn exists(&self) -> bool {
        // `Path::exists` follows symlinks, so a dangling symlink would look
        //	like a missing object
        let path = self.to_path_buf();
        path.is_symlink() || path.exists()
    }
    /// Type of the object at this path, without following symlinks
    pub fn object_type(&self) -> Option<ObjectType> {
        let metadata = std::fs::symlink_metadata(self.to_path_buf()).ok()?;
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Some(ObjectType::SymLink)
        } else if file_type.is_dir() {
            Some(ObjectType::Dir)
        } else if file_type.is_file() {
            Some(ObjectType::File)
        } else {
            Some(ObjectType::Other)
        }
    }
}
impl<'a> IntoIterator for &'a AbstPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
impl std::fmt::Display for AbstPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = self.to_path_buf().to_string_lossy().into_owned();
        #[cfg(windows)]
        let string = string.replace('\\', "/");
        write!(f, "{}", string)
    }
}
