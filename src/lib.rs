//! # tablekv
//!
//! An embedded key-value store organised in named tables, with two
//! interchangeable backends behind one contract.
//!
//! ## Features
//!
//! - **One contract**: `set`/`get`/`has`/`delete`/`all` via [`KvStore`]
//! - **JSON documents** (`json` feature): one file per table, nested path keys
//!   such as `"user.address.city"`, atomic whole-document rewrites
//! - **SQLite** (`sqlite` feature): one relation per table, flat keys,
//!   insert-or-update on primary-key conflict
//! - **Fixed tables**: only the tables provisioned at open time are accepted
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tablekv::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = StoreConfig::builder()
//!     .path(dir.path())
//!     .tables(vec!["users".into()])
//!     .build();
//! let store = JsonStore::open(config).unwrap();
//!
//! store.set("alice.age", json!(31), "users").unwrap();
//! assert_eq!(store.get("alice.age", "users").unwrap(), Some(json!(31)));
//! assert!(matches!(store.get("x", "nope"), Err(StoreError::InvalidTable(_))));
//! ```
//!
//! [`KvStore`]: traits::store_ops::KvStore

pub mod config;
pub mod databases;
pub mod errors;
pub mod path;
pub mod prelude;
pub mod store;
pub mod tables;
pub mod traits;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use traits::store_ops::{Entry, KeyModel, KvStore, KvStoreExt};
