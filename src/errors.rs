use std::path::PathBuf;
use thiserror::Error;

use crate::path::PathError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid table \"{0}\" provided")]
    InvalidTable(String),

    #[error("Invalid table name \"{0}\": expected an identifier of ASCII letters, digits and '_'")]
    InvalidTableName(String),

    #[error("Invalid key \"{key}\": {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: PathError,
    },

    #[error("Failed to open storage at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: StorageFailure,
    },

    #[error("Storage Read Error on table \"{table}\": {source}")]
    StorageRead {
        table: String,
        #[source]
        source: StorageFailure,
    },

    #[error("Storage Write Error on table \"{table}\": {source}")]
    StorageWrite {
        table: String,
        #[source]
        source: StorageFailure,
    },

    #[error("Failed to close storage: {0}")]
    Close(#[source] StorageFailure),

    #[error("There was an error encoding the value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("There was an error decoding the value: {0}")]
    Decode(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn read(table: &str, source: impl Into<StorageFailure>) -> Self {
        StoreError::StorageRead {
            table: table.to_owned(),
            source: source.into(),
        }
    }

    pub(crate) fn write(table: &str, source: impl Into<StorageFailure>) -> Self {
        StoreError::StorageWrite {
            table: table.to_owned(),
            source: source.into(),
        }
    }

    pub(crate) fn invalid_key(key: &str, source: PathError) -> Self {
        StoreError::InvalidKey {
            key: key.to_owned(),
            source,
        }
    }

    pub(crate) fn open(path: impl Into<PathBuf>, source: impl Into<StorageFailure>) -> Self {
        StoreError::Open {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// The underlying cause of a storage-level failure.
#[derive(Error, Debug)]
pub enum StorageFailure {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "json")]
    #[error("Atomic replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[cfg(feature = "sqlite")]
    #[error("SQLite Error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Other(String),
}
