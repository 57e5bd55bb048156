use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised while loading, validating or rendering the
/// model database. Anything that is only worth a warning is logged instead.
#[derive(Error, Debug)]
pub enum ModelsError {
    #[error("cannot find database directory {0:?}, rerun from the model database directory")]
    DatabaseNotFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse file {path:?} - {message}")]
    Parse { path: PathBuf, message: String },

    #[error("empty database in {0:?}")]
    EmptyDatabase(PathBuf),

    #[error("model {0} is defined more than once")]
    DuplicateModel(String),

    #[error("products registry error: {0}")]
    Registry(String),

    #[error("{model} contains empty {field}")]
    EmptyCode { model: String, field: &'static str },

    #[error("{model} shares {field} {code} with other model")]
    SharedCode {
        model: String,
        field: &'static str,
        code: String,
    },

    #[error("model {0} is used in DataBase but not present in Products")]
    UnknownProduct(String),

    #[error("model {0} is used in DataBase but not valid in Products")]
    InvalidProduct(String),

    #[error("{model} is missing required field {field}")]
    MissingField { model: String, field: &'static str },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelsError>;
