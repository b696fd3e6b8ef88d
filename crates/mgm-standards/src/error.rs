#![deny(unsafe_code)]

use std::path::PathBuf;

use mgm_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("missing required column {column} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path} line {line}: {message}")]
    InvalidEntry {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("invalid schema {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl SchemaLoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
