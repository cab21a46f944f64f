//! Whole-document JSON backend.
//!
//! Every table is one JSON object stored in `<dir>/<table>.json`. Keys are
//! [path keys](crate::path): `"a.b"` addresses `{"a": {"b": ...}}` inside the
//! table document.
//!
//! # Module Organization
//!
//! - `document.rs` - Loading and atomically replacing table documents
//! - `store.rs` - [`JsonStore`] and its [`KvStore`](crate::traits::store_ops::KvStore) implementation
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use tablekv::databases::json_store::JsonStore;
//! use tablekv::traits::store_ops::KvStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = JsonStore::with_tables(dir.path(), ["settings"]).unwrap();
//!
//! store.set("theme.color", json!("dark"), "settings").unwrap();
//! assert_eq!(store.get("theme.color", "settings").unwrap(), Some(json!("dark")));
//!
//! // `all` lists top-level entries only.
//! let entries = store.all("settings").unwrap();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].key, "theme");
//! ```

mod document;
pub mod store;

pub use store::JsonStore;
