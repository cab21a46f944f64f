//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits,
//! allowing users to get started quickly with a single import.
//!
//! # Usage
//!
//! ```rust
//! use tablekv::prelude::*;
//!
//! let store = SqliteStore::in_memory(["main"]).unwrap();
//! store.set_as("answer", &42u32, "main").unwrap();
//! let answer: Option<u32> = store.get_as("answer", "main").unwrap();
//! assert_eq!(answer, Some(42));
//! ```
//!
//! # What's Included
//!
//! - [`KvStore`] and [`KvStoreExt`]: the store contract and typed helpers
//! - [`Entry`], [`KeyModel`]: pairs returned by `all` and key interpretation
//! - [`JsonStore`], [`SqliteStore`]: the two engines (per enabled feature)
//! - [`StoreConfig`], [`BackendKind`], [`open`]: configuration and runtime choice
//! - [`StoreError`], [`StoreResult`]: error handling

pub use crate::config::StoreConfig;
pub use crate::errors::{StorageFailure, StoreError, StoreResult};
pub use crate::store::{BackendKind, open};
pub use crate::traits::store_ops::{Entry, KeyModel, KvStore, KvStoreExt};

#[cfg(feature = "json")]
pub use crate::databases::json_store::JsonStore;

#[cfg(feature = "sqlite")]
pub use crate::databases::sqlite_store::SqliteStore;
