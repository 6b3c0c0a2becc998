use serde::{Deserialize, Serialize};

use super::{error_context, inerr, AbstPath, Error};

/// Last modification time of an object, as seconds and nanoseconds since the
/// Unix epoch
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mtime(i64, u32);

impl Mtime {
    pub fn from(seconds: i64, nanoseconds: u32) -> Mtime {
        Mtime(seconds, nanoseconds)
    }
    pub fn seconds(&self) -> i64 {
        self.0
    }
    pub fn nanoseconds(&self) -> u32 {
        self.1
    }
    /// Single integer with nanosecond granularity, comparable across calls
    pub fn as_nanos(&self) -> i128 {
        self.0 as i128 * 1_000_000_000 + self.1 as i128
    }
}

impl std::fmt::Display for Mtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match chrono::DateTime::from_timestamp(self.0, self.1) {
            Some(timestamp) => write!(f, "{}", timestamp.naive_utc()),
            None => write!(f, "{}.{:09}", self.0, self.1),
        }
    }
}

/// Get the mtime of an object, without following symlinks
pub fn get_mtime(path: &AbstPath) -> Result<Mtime, Error> {
    let errctx = error_context(format!("could not get mtime from path {path}"));
    let metadata = std::fs::symlink_metadata(path.to_path_buf())
        .map_err(inerr(errctx("get metadata of object")))?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);

    Ok(Mtime(mtime.unix_seconds(), mtime.nanoseconds()))
}

/// Set the mtime of an object.
///
/// NOTE: atime is set to the same value, as `filetime` has no way of setting
/// only the mtime without following symlinks
pub fn set_mtime(path: &AbstPath, mtime: &Mtime) -> Result<(), Error> {
    let errctx = error_context(format!("could not set mtime at path {path}"));
    let mtime = filetime::FileTime::from_unix_time(mtime.0, mtime.1);
    filetime::set_symlink_file_times(path.to_path_buf(), mtime, mtime)
        .map_err(inerr(errctx("set mtime")))
}

#[cfg(test)]
mod tests {
    use super::{get_mtime, set_mtime, AbstPath, Mtime};

    const TEST_MTIME: Mtime = Mtime(498705663, 141592653);

    #[test]
    fn accessors() {
        assert_eq!(TEST_MTIME, Mtime::from(498705663, 141592653));
        assert_eq!(TEST_MTIME.seconds(), 498705663);
        assert_eq!(TEST_MTIME.nanoseconds(), 141592653);
        assert_eq!(TEST_MTIME.as_nanos(), 498705663141592653);
        assert!(Mtime::from(1, 0).as_nanos() > Mtime::from(0, 999_999_999).as_nanos());
        assert!(Mtime::from(1, 0) > Mtime::from(0, 999_999_999));
    }

    #[test]
    fn to_string() {
        assert_eq!(format!("{TEST_MTIME}"), "1985-10-21 01:21:03.141592653");
    }

    #[test]
    fn get_set_mtime() {
        let sandbox = tempfile::TempDir::new().unwrap();
        let root = AbstPath::from(sandbox.path());

        let dir = root.add_last("dir");
        std::fs::create_dir(dir.to_path_buf()).unwrap();
        set_mtime(&dir, &TEST_MTIME).unwrap();
        assert_eq!(get_mtime(&dir).unwrap(), TEST_MTIME);

        let file = root.add_last("file");
        std::fs::File::create(file.to_path_buf()).unwrap();
        set_mtime(&file, &TEST_MTIME).unwrap();
        assert_eq!(get_mtime(&file).unwrap(), TEST_MTIME);

        assert!(get_mtime(&root.add_last("non_existing_object")).is_err());
        assert!(set_mtime(&root.add_last("non_existing_object"), &TEST_MTIME).is_err());
    }
}
