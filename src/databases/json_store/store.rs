use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::{Map, Value};

use super::document::{self, WriteOptions};
use crate::config::StoreConfig;
use crate::errors::{StorageFailure, StoreError, StoreResult};
use crate::path::KeyPath;
use crate::tables::TableSet;
use crate::traits::store_ops::{Entry, KeyModel, KvStore};

/// Store keeping one JSON document per table in a directory.
///
/// Mutations follow a read-modify-write protocol: the whole document is
/// loaded, changed in memory and written back in full. File handles only live
/// for the duration of a single call.
///
/// # Failure policy
///
/// | operation | unreadable or corrupt document          | write failure  |
/// |-----------|-----------------------------------------|----------------|
/// | `get`     | treated as empty, logged                | n/a            |
/// | `has`     | treated as empty, logged                | n/a            |
/// | `all`     | treated as empty, logged                | n/a            |
/// | `set`     | `StorageRead` (a missing file is empty) | `StorageWrite` |
///
/// A `set` whose path cannot be written (see [`KeyPath::assign`]) fails with
/// `InvalidKey` and leaves the document untouched.
/// | `delete`  | `Ok(false)`, logged, nothing written    | `StorageWrite` |
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    tables: TableSet,
    options: WriteOptions,
}

impl JsonStore {
    /// Open a store in `dir` with the default `main` table.
    pub fn new<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        Self::open(StoreConfig::new(dir.as_ref()))
    }

    /// Open a store in `dir` provisioning the given tables.
    pub fn with_tables<P, I, S>(dir: P, tables: I) -> StoreResult<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::open(StoreConfig::new(dir.as_ref()).with_tables(tables))
    }

    /// Create a store under a fresh directory in the system temp dir.
    pub fn temp() -> StoreResult<Self> {
        Self::open(StoreConfig::temp())
    }

    /// Open a store from a full configuration.
    ///
    /// Ensures the directory exists and writes `{}` for every table whose
    /// document is missing. Existing documents are left untouched.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let tables = TableSet::new(&config.tables)?;
        let options = WriteOptions::from(&config);
        let dir = config.path;

        if !dir.is_dir() {
            if !config.create_if_missing {
                return Err(StoreError::open(
                    &dir,
                    io::Error::new(io::ErrorKind::NotFound, "store directory does not exist"),
                ));
            }
            fs::create_dir_all(&dir).map_err(|e| StoreError::open(&dir, e))?;
        }

        let store = Self {
            dir,
            tables,
            options,
        };
        for table in store.tables.names() {
            let path = store.table_path(table);
            if !path.is_file() {
                debug!("provisioning table \"{table}\" at {path:?}");
                document::replace(&path, &Map::new(), store.options)
                    .map_err(|e| StoreError::write(table, e))?;
            }
        }
        Ok(store)
    }

    /// The directory holding the table documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of a table's document.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.json"))
    }

    /// Load for a read-only operation; any failure degrades to `{}`.
    fn load_or_empty(&self, table: &str) -> Map<String, Value> {
        match document::load(&self.table_path(table)) {
            Ok(document) => document,
            Err(e) => {
                warn!("table \"{table}\" is unreadable, treating it as empty: {e}");
                Map::new()
            }
        }
    }

    /// Load for a mutation. Only a missing file counts as empty.
    fn load_for_update(&self, table: &str) -> StoreResult<Map<String, Value>> {
        match document::load(&self.table_path(table)) {
            Ok(document) => Ok(document),
            Err(StorageFailure::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!("document for table \"{table}\" is missing, recreating it");
                Ok(Map::new())
            }
            Err(e) => Err(StoreError::read(table, e)),
        }
    }

    fn store_document(&self, table: &str, document: &Map<String, Value>) -> StoreResult<()> {
        document::replace(&self.table_path(table), document, self.options)
            .map_err(|e| StoreError::write(table, e))
    }
}

impl KvStore for JsonStore {
    fn tables(&self) -> &[String] {
        self.tables.names()
    }

    fn key_model(&self) -> KeyModel {
        KeyModel::Path
    }

    fn set(&self, key: &str, value: Value, table: &str) -> StoreResult<()> {
        self.tables.check(table)?;
        let mut document = self.load_for_update(table)?;
        KeyPath::parse(key)
            .assign_in(&mut document, value)
            .map_err(|e| StoreError::invalid_key(key, e))?;
        debug!("set \"{key}\" in table \"{table}\"");
        self.store_document(table, &document)
    }

    fn get(&self, key: &str, table: &str) -> StoreResult<Option<Value>> {
        self.tables.check(table)?;
        let document = self.load_or_empty(table);
        Ok(KeyPath::parse(key).lookup_in(&document).cloned())
    }

    fn has(&self, key: &str, table: &str) -> StoreResult<bool> {
        self.tables.check(table)?;
        let document = self.load_or_empty(table);
        Ok(KeyPath::parse(key).lookup_in(&document).is_some())
    }

    fn delete(&self, key: &str, table: &str) -> StoreResult<bool> {
        self.tables.check(table)?;
        let mut document = match document::load(&self.table_path(table)) {
            Ok(document) => document,
            Err(e) => {
                warn!("table \"{table}\" is unreadable, skipping delete of \"{key}\": {e}");
                return Ok(false);
            }
        };
        if !KeyPath::parse(key).remove_in(&mut document) {
            return Ok(false);
        }
        debug!("deleted \"{key}\" from table \"{table}\"");
        self.store_document(table, &document)?;
        Ok(true)
    }

    fn all(&self, table: &str) -> StoreResult<Vec<Entry>> {
        self.tables.check(table)?;
        Ok(self
            .load_or_empty(table)
            .into_iter()
            .map(|(key, value)| Entry::new(key, value))
            .collect())
    }
}
