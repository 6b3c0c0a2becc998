use super::{ensure_parent, error_context, inerr, wrgobj, AbstPath, Error, ObjectType};

/// Copy the content of the file at `from` to `to`, overwriting `to` if it is
/// a file and creating its missing parent directories. Returns the number of
/// bytes copied
pub fn copy_file(from: &AbstPath, to: &AbstPath) -> Result<u64, Error> {
    let errctx = error_context(format!("could not copy file from path {from} to path {to}"));
    if from.object_type() != Some(ObjectType::File) {
        return Err(wrgobj(errctx("read source"), ObjectType::File, from));
    }
    match to.object_type() {
        None | Some(ObjectType::File) => {}
        Some(_) => return Err(wrgobj(errctx("overwrite target"), ObjectType::File, to)),
    }
    ensure_parent(to).map_err(inerr(errctx("ensure parent directory")))?;
    std::fs::copy(from.to_path_buf(), to.to_path_buf()).map_err(inerr(errctx("copy content")))
}

/// Remove a file. Symlinks and directories are refused
pub fn remove_file(path: &AbstPath) -> Result<(), Error> {
    let errctx = error_context(format!("could not remove file at path {path}"));
    if path.object_type() != Some(ObjectType::File) {
        return Err(wrgobj(errctx("remove file"), ObjectType::File, path));
    }
    std::fs::remove_file(path.to_path_buf()).map_err(inerr(errctx("remove file")))
}
