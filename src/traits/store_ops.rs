//! Basic store operations shared by every backend.
//!
//! This module defines [`KvStore`], the table-scoped key-value contract that
//! both the JSON document engine and the SQLite engine implement, along with
//! the [`Entry`] pairs returned by [`KvStore::all`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{StoreError, StoreResult};

/// One `{key, value}` pair of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// How a backend interprets the key strings it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyModel {
    /// Keys are path keys (`"a.b[0]"`) addressing nested locations in a value.
    Path,
    /// Keys are opaque strings; `"a.b"` is just the literal key `"a.b"`.
    Flat,
}

/// Core store operations for a set of provisioned tables.
///
/// Every method first checks `table` against the tables provisioned when the
/// store was opened and fails with [`StoreError::InvalidTable`] otherwise,
/// before touching storage.
///
/// # Failure policy
///
/// Backends differ in which storage failures they surface and which they
/// degrade to "nothing found". Each implementation documents its policy per
/// operation; swallowed failures are logged at `warn` level.
pub trait KvStore {
    /// The provisioned table names, in declaration order.
    fn tables(&self) -> &[String];

    /// How this backend interprets keys.
    fn key_model(&self) -> KeyModel;

    /// Insert or overwrite the value at `key` in `table`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key, interpreted per [`KvStore::key_model`]
    /// * `value` - The value to store
    /// * `table` - A provisioned table name
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the mutation is persisted
    /// * `Err(StoreError)` if the table is invalid or the write failed
    fn set(&self, key: &str, value: Value, table: &str) -> StoreResult<()>;

    /// Get the value currently stored at `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` if the key is present
    /// * `Ok(None)` if the key is absent
    /// * `Err(StoreError)` if the table is invalid
    fn get(&self, key: &str, table: &str) -> StoreResult<Option<Value>>;

    /// Whether `key` is present. Agrees with [`KvStore::get`].
    fn has(&self, key: &str, table: &str) -> StoreResult<bool>;

    /// Remove `key` if present.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if an entry was removed
    /// * `Ok(false)` if there was nothing to remove
    fn delete(&self, key: &str, table: &str) -> StoreResult<bool>;

    /// Every pair in `table`, in storage order.
    fn all(&self, table: &str) -> StoreResult<Vec<Entry>>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn tables(&self) -> &[String] {
        (**self).tables()
    }

    fn key_model(&self) -> KeyModel {
        (**self).key_model()
    }

    fn set(&self, key: &str, value: Value, table: &str) -> StoreResult<()> {
        (**self).set(key, value, table)
    }

    fn get(&self, key: &str, table: &str) -> StoreResult<Option<Value>> {
        (**self).get(key, table)
    }

    fn has(&self, key: &str, table: &str) -> StoreResult<bool> {
        (**self).has(key, table)
    }

    fn delete(&self, key: &str, table: &str) -> StoreResult<bool> {
        (**self).delete(key, table)
    }

    fn all(&self, table: &str) -> StoreResult<Vec<Entry>> {
        (**self).all(table)
    }
}

/// Typed convenience methods over any [`KvStore`].
pub trait KvStoreExt: KvStore {
    /// Serialize `value` to JSON and store it.
    fn set_as<T: Serialize + ?Sized>(&self, key: &str, value: &T, table: &str) -> StoreResult<()> {
        let value = serde_json::to_value(value).map_err(StoreError::Encode)?;
        self.set(key, value, table)
    }

    /// Fetch the value at `key` and deserialize it.
    fn get_as<T: DeserializeOwned>(&self, key: &str, table: &str) -> StoreResult<Option<T>> {
        self.get(key, table)?
            .map(|value| serde_json::from_value(value).map_err(StoreError::Decode))
            .transpose()
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
