use super::{AbstPath, ObjectType};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Abstract File System Error: cannot pick an encoding for a file with unknown extension.\nPath: {path}")]
    UnknownExtension { path: String },

    #[error("Abstract File System Error: operation expected {expected} but found {found}.\nSource: {src}")]
    WrongObject {
        src: String,
        expected: String,
        found: String,
    },

    #[error("Abstract File System Error: inner error occurred.\nSource: {src}\n{err}")]
    Inner { src: String, err: String },

    #[error("Abstract File System Error: some error occurred.\nSource: {src}\nError: {err}")]
    Generic { src: String, err: String },
}

pub fn unkext(path: &AbstPath) -> Error {
    Error::UnknownExtension {
        path: path.to_string(),
    }
}
/// Error for an object at `path` whose type is not `expected`
pub fn wrgobj<S: std::string::ToString>(src: S, expected: ObjectType, path: &AbstPath) -> Error {
    let found = match path.object_type() {
        Some(found) => found.to_string(),
        None => String::from("nothing"),
    };
    Error::WrongObject {
        src: src.to_string(),
        expected: expected.to_string(),
        found,
    }
}
pub fn inerr<S: std::string::ToString, E: std::error::Error>(src: S) -> impl Fn(E) -> Error {
    move |err: E| -> Error {
        Error::Inner {
            src: src.to_string(),
            err: err.to_string(),
        }
    }
}
pub fn generr<S: std::string::ToString, T: std::string::ToString>(src: S, err: T) -> Error {
    Error::Generic {
        src: src.to_string(),
        err: err.to_string(),
    }
}
pub fn error_context<S: std::string::ToString>(context: S) -> impl Fn(&str) -> String {
    move |failure: &str| -> String { format!("{}\nFailed to {}", context.to_string(), failure) }
}
