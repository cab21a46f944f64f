//! Configuration shared by every storage backend.
//!
//! Both engines are opened from a [`StoreConfig`], built with `typed-builder`.
//! The `path` is interpreted per backend: a directory holding one
//! `<table>.json` file per table for the JSON engine, a single database file
//! for the SQLite engine.

use std::path::PathBuf;
use typed_builder::TypedBuilder;

use crate::tables::DEFAULT_TABLE;

/// Configuration for opening a store.
///
/// # Examples
///
/// ```
/// use tablekv::config::StoreConfig;
///
/// // Create with defaults
/// let config = StoreConfig::builder()
///     .path("data")
///     .build();
/// assert_eq!(config.tables, vec!["main".to_string()]);
///
/// // Customize options
/// let config = StoreConfig::builder()
///     .path("/var/lib/app/store")
///     .tables(vec!["users".into(), "sessions".into()])
///     .pretty(true)
///     .build();
/// assert!(config.atomic_writes);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct StoreConfig {
    /// Storage location: a directory (JSON) or a database file (SQLite)
    #[builder(setter(into))]
    pub path: PathBuf,

    /// Table names to provision. An empty list means `["main"]`.
    #[builder(default = vec![DEFAULT_TABLE.to_string()])]
    pub tables: Vec<String>,

    /// Whether to create the directory or database file if it doesn't exist
    #[builder(default = true)]
    pub create_if_missing: bool,

    /// Write documents to a temp file and rename over the old one (JSON only)
    #[builder(default = true)]
    pub atomic_writes: bool,

    /// fsync the temp file before the rename (JSON only)
    #[builder(default = true)]
    pub use_fsync: bool,

    /// Pretty-print documents (JSON only)
    #[builder(default = false)]
    pub pretty: bool,
}

impl StoreConfig {
    /// Create a basic configuration with just a path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            tables: vec![DEFAULT_TABLE.to_string()],
            create_if_missing: true,
            atomic_writes: true,
            use_fsync: true,
            pretty: false,
        }
    }

    /// Create configuration for a store under the system temp directory.
    ///
    /// The location is unique per call but is not cleaned up automatically.
    pub fn temp() -> Self {
        let temp_path = std::env::temp_dir().join(format!("tablekv_{}", uuid::Uuid::new_v4()));
        Self::new(temp_path)
    }

    /// Replace the table list.
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }
}
