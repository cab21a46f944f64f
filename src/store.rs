//! Opening a backend chosen at runtime.
//!
//! Callers that know their backend at compile time can use
//! [`JsonStore`](crate::databases::json_store::JsonStore) or
//! [`SqliteStore`](crate::databases::sqlite_store::SqliteStore) directly.
//! [`open`] picks one from a [`BackendKind`] and hands it back as a trait
//! object; every call still goes straight to that engine.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tablekv::config::StoreConfig;
//! use tablekv::store::{self, BackendKind};
//! use tablekv::traits::store_ops::KvStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let kind: BackendKind = "json".parse().unwrap();
//! let store = store::open(kind, StoreConfig::new(dir.path())).unwrap();
//!
//! store.set("greeting", json!("hello"), "main").unwrap();
//! assert!(store.has("greeting", "main").unwrap());
//! ```

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::StoreConfig;
use crate::errors::StoreResult;
use crate::traits::store_ops::KvStore;

/// The available storage engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    /// One JSON document per table in a directory
    #[cfg(feature = "json")]
    Json,
    /// One relation per table in a SQLite database file
    #[cfg(feature = "sqlite")]
    Sqlite,
}

/// Open the chosen backend at `config.path`, provisioning `config.tables`.
pub fn open(kind: BackendKind, config: StoreConfig) -> StoreResult<Box<dyn KvStore>> {
    log::debug!("opening {kind} store at {:?}", config.path);
    let store: Box<dyn KvStore> = match kind {
        #[cfg(feature = "json")]
        BackendKind::Json => Box::new(crate::databases::json_store::JsonStore::open(config)?),
        #[cfg(feature = "sqlite")]
        BackendKind::Sqlite => Box::new(crate::databases::sqlite_store::SqliteStore::open(config)?),
    };
    Ok(store)
}
