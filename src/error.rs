use abst_fs::AbstPath;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Merkle Tree Error: invalid usage.\nSource: {src}\nError: {err}")]
    Usage { src: String, err: String },

    #[error(
        "Merkle Tree Error: sibling chains diverged during lock-step walk.\nParent: {parent}\nExpected: {expected}\nFound: {found}"
    )]
    StructuralMismatch {
        parent: AbstPath,
        expected: String,
        found: String,
    },

    #[error("Merkle Tree Error: i/o failure.\nSource: {src}\n{err}")]
    Io { src: String, err: String },

    #[error("Merkle Tree Error: snapshot is not a valid tree.\nSource: {src}\nError: {err}")]
    Snapshot { src: String, err: String },

    #[error("Merkle Tree Error: invalid configuration.\nSource: {src}\nError: {err}")]
    Config { src: String, err: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn usgerr<S: std::string::ToString, T: std::string::ToString>(src: S, err: T) -> Error {
    Error::Usage {
        src: src.to_string(),
        err: err.to_string(),
    }
}
pub fn snperr<S: std::string::ToString, T: std::string::ToString>(src: S, err: T) -> Error {
    Error::Snapshot {
        src: src.to_string(),
        err: err.to_string(),
    }
}
pub fn inerr<S: std::string::ToString, E: std::error::Error>(src: S) -> impl Fn(E) -> Error {
    move |err: E| -> Error {
        Error::Io {
            src: src.to_string(),
            err: err.to_string(),
        }
    }
}
pub fn cfgerr<S: std::string::ToString, E: std::error::Error>(src: S) -> impl Fn(E) -> Error {
    move |err: E| -> Error {
        Error::Config {
            src: src.to_string(),
            err: err.to_string(),
        }
    }
}
pub fn mismatch(parent: &AbstPath, expected: Option<&AbstPath>, found: Option<&AbstPath>) -> Error {
    let describe = |path: Option<&AbstPath>| match path {
        Some(path) => format!("entry {path}"),
        None => String::from("end of sibling chain"),
    };
    Error::StructuralMismatch {
        parent: parent.clone(),
        expected: describe(expected),
        found: describe(found),
    }
}
pub fn error_context<S: std::string::ToString>(context: S) -> impl Fn(&str) -> String {
    move |failure: &str| -> String { format!("{}\nFailed to {}", context.to_string(), failure) }
}
