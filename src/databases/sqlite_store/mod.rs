//! Relational backend on top of [SQLite](https://docs.rs/rusqlite).
//!
//! Each table is one relation `(key TEXT PRIMARY KEY, value TEXT)` inside a
//! shared database file. Keys are opaque: `"a.b"` is stored as the literal key
//! `"a.b"` and is unrelated to a key `"a"`.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use tablekv::databases::sqlite_store::SqliteStore;
//! use tablekv::traits::store_ops::KvStore;
//!
//! let store = SqliteStore::in_memory(["sessions"]).unwrap();
//!
//! store.set("abc", json!({ "user": 7 }), "sessions").unwrap();
//! store.set("abc", json!({ "user": 8 }), "sessions").unwrap();
//! assert_eq!(store.get("abc", "sessions").unwrap(), Some(json!({ "user": 8 })));
//! assert_eq!(store.all("sessions").unwrap().len(), 1);
//!
//! store.close().unwrap();
//! ```

pub mod store;

pub use store::SqliteStore;
