// Common test utilities and helpers
#![allow(dead_code)]

use std::path::Path;

use tablekv::config::StoreConfig;
use tablekv::databases::json_store::JsonStore;
use tablekv::databases::sqlite_store::SqliteStore;
use tablekv::store::{self, BackendKind};
use tablekv::traits::store_ops::KvStore;

pub const TABLES: [&str; 2] = ["main", "users"];

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config_for(kind: BackendKind, root: &Path) -> StoreConfig {
    let path = match kind {
        BackendKind::Json => root.join("json"),
        BackendKind::Sqlite => root.join("store.sqlite3"),
    };
    StoreConfig::builder()
        .path(path)
        .tables(TABLES.iter().map(|t| t.to_string()).collect())
        .use_fsync(false)
        .build()
}

/// Open a store of the given kind under `root`.
pub fn open_store(kind: BackendKind, root: &Path) -> Box<dyn KvStore> {
    init_logging();
    store::open(kind, config_for(kind, root)).expect("store should open")
}

pub fn json_store(root: &Path) -> JsonStore {
    init_logging();
    JsonStore::open(config_for(BackendKind::Json, root)).expect("json store should open")
}

pub fn sqlite_store(root: &Path) -> SqliteStore {
    init_logging();
    SqliteStore::open(config_for(BackendKind::Sqlite, root)).expect("sqlite store should open")
}

pub const BACKENDS: [BackendKind; 2] = [BackendKind::Json, BackendKind::Sqlite];
