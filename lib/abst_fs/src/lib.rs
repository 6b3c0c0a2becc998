//! Thin layer over `std::fs` working on component-based paths, with the
//! handful of operations a directory mirror needs: listing, creating and
//! removing directories, copying and removing files, reading and stamping
//! modification times, and saving/loading serializable data.

mod error;
pub use error::Error;
use error::{error_context, generr, inerr, unkext, wrgobj};

mod path;
pub use path::{AbstPath, ObjectType};

mod directory;
pub use directory::{create_dir, ensure_parent, list_dir_content, remove_dir_all, DirContent};

mod file;
pub use file::{copy_file, remove_file};

mod mtime;
pub use mtime::{get_mtime, set_mtime, Mtime};

mod saveload;
pub use saveload::{load, save};

mod env;
pub use env::home_dir;
