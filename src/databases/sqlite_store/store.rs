use std::path::{Path, PathBuf};

use log::{debug, warn};
use rusqlite::{Connection, OpenFlags, OptionalExtension, ffi, params};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::errors::{StoreError, StoreResult};
use crate::tables::TableSet;
use crate::traits::store_ops::{Entry, KeyModel, KvStore};

/// Store keeping every table as a `(key TEXT PRIMARY KEY, value TEXT)`
/// relation inside one SQLite database.
///
/// The connection is opened once and owned by the handle until
/// [`SqliteStore::close`] or drop. Values are stored as JSON text.
///
/// # Failure policy
///
/// | operation | backend failure                                  |
/// |-----------|--------------------------------------------------|
/// | `set`     | `StorageWrite` (a primary-key conflict updates)  |
/// | `get`     | `Ok(None)`, logged                               |
/// | `has`     | `Ok(false)`, logged                              |
/// | `delete`  | `Ok(false)`, logged                              |
/// | `all`     | `Ok(vec![])`, logged                             |
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
    tables: TableSet,
}

impl SqliteStore {
    /// Open the database file at `path` with the default `main` table.
    pub fn new<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::open(StoreConfig::new(path.as_ref()))
    }

    /// Open the database file at `path` provisioning the given tables.
    pub fn with_tables<P, I, S>(path: P, tables: I) -> StoreResult<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::open(StoreConfig::new(path.as_ref()).with_tables(tables))
    }

    /// Open a private in-memory database. Nothing outlives the handle.
    pub fn in_memory<I, S>(tables: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tables = TableSet::new(tables)?;
        let conn = Connection::open_in_memory().map_err(|e| StoreError::open(":memory:", e))?;
        Self::provision(conn, None, tables)
    }

    /// Open a store from a full configuration.
    ///
    /// Issues `CREATE TABLE IF NOT EXISTS` for every declared table, so
    /// reopening an existing database keeps its rows.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let tables = TableSet::new(&config.tables)?;
        let mut flags = OpenFlags::default();
        if !config.create_if_missing {
            flags.remove(OpenFlags::SQLITE_OPEN_CREATE);
        }
        let conn = Connection::open_with_flags(&config.path, flags)
            .map_err(|e| StoreError::open(&config.path, e))?;
        Self::provision(conn, Some(config.path), tables)
    }

    fn provision(conn: Connection, path: Option<PathBuf>, tables: TableSet) -> StoreResult<Self> {
        for table in tables.names() {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, value TEXT)",
                quote(table)
            );
            conn.execute_batch(&sql)
                .map_err(|e| StoreError::write(table, e))?;
            debug!("provisioned table \"{table}\"");
        }
        Ok(Self { conn, path, tables })
    }

    /// The database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the raw connection for advanced operations.
    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, reporting any failure to release it.
    pub fn close(self) -> StoreResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StoreError::Close(e.into()))
    }

    fn select_all(&self, table: &str) -> rusqlite::Result<Vec<Entry>> {
        let sql = format!("SELECT key, value FROM {} ORDER BY rowid", quote(table));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Entry::new(row.get::<_, String>(0)?, decode_value(row.get(1)?)))
        })?;
        rows.collect()
    }
}

impl KvStore for SqliteStore {
    fn tables(&self) -> &[String] {
        self.tables.names()
    }

    fn key_model(&self) -> KeyModel {
        KeyModel::Flat
    }

    fn set(&self, key: &str, value: Value, table: &str) -> StoreResult<()> {
        self.tables.check(table)?;
        let encoded = serde_json::to_string(&value).map_err(StoreError::Encode)?;

        let insert = format!("INSERT INTO {} (key, value) VALUES (?1, ?2)", quote(table));
        match self.conn.execute(&insert, params![key, encoded]) {
            Ok(_) => {
                debug!("inserted \"{key}\" into table \"{table}\"");
                Ok(())
            }
            Err(e) if is_primary_key_conflict(&e) => {
                let update = format!("UPDATE {} SET value = ?1 WHERE key = ?2", quote(table));
                self.conn
                    .execute(&update, params![encoded, key])
                    .map_err(|e| StoreError::write(table, e))?;
                debug!("updated \"{key}\" in table \"{table}\"");
                Ok(())
            }
            Err(e) => Err(StoreError::write(table, e)),
        }
    }

    fn get(&self, key: &str, table: &str) -> StoreResult<Option<Value>> {
        self.tables.check(table)?;
        let sql = format!("SELECT value FROM {} WHERE key = ?1", quote(table));
        let found = self
            .conn
            .query_row(&sql, [key], |row| row.get::<_, Option<String>>(0))
            .optional();
        match found {
            Ok(raw) => Ok(raw.map(decode_value)),
            Err(e) => {
                warn!("get of \"{key}\" from table \"{table}\" failed, reporting absent: {e}");
                Ok(None)
            }
        }
    }

    fn has(&self, key: &str, table: &str) -> StoreResult<bool> {
        self.tables.check(table)?;
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE key = ?1)", quote(table));
        match self.conn.query_row(&sql, [key], |row| row.get::<_, bool>(0)) {
            Ok(exists) => Ok(exists),
            Err(e) => {
                warn!("has of \"{key}\" in table \"{table}\" failed, reporting absent: {e}");
                Ok(false)
            }
        }
    }

    fn delete(&self, key: &str, table: &str) -> StoreResult<bool> {
        self.tables.check(table)?;
        let sql = format!("DELETE FROM {} WHERE key = ?1", quote(table));
        match self.conn.execute(&sql, [key]) {
            Ok(removed) => Ok(removed > 0),
            Err(e) => {
                warn!("delete of \"{key}\" from table \"{table}\" failed: {e}");
                Ok(false)
            }
        }
    }

    fn all(&self, table: &str) -> StoreResult<Vec<Entry>> {
        self.tables.check(table)?;
        match self.select_all(table) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("listing table \"{table}\" failed, reporting it empty: {e}");
                Ok(Vec::new())
            }
        }
    }
}

/// Quote a validated table name as an SQL identifier.
fn quote(table: &str) -> String {
    format!("\"{table}\"")
}

fn is_primary_key_conflict(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Stored text is JSON; anything else written by a foreign writer is kept as
/// a plain string. SQL `NULL` reads as JSON `null`.
fn decode_value(raw: Option<String>) -> Value {
    let Some(text) = raw else {
        return Value::Null;
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_value_falls_back_to_raw_text() {
        assert_eq!(decode_value(Some(r#"{"a":1}"#.into())), json!({ "a": 1 }));
        assert_eq!(decode_value(Some("\"quoted\"".into())), json!("quoted"));
        assert_eq!(decode_value(Some("not json".into())), json!("not json"));
        assert_eq!(decode_value(None), Value::Null);
    }

    #[test]
    fn only_primary_key_violations_count_as_conflicts() {
        let store = SqliteStore::in_memory(["main"]).unwrap();
        store.set("k", json!(1), "main").unwrap();

        let conflict = store
            .raw_connection()
            .execute("INSERT INTO \"main\" (key, value) VALUES ('k', '2')", [])
            .unwrap_err();
        assert!(is_primary_key_conflict(&conflict));

        let missing_table = store
            .raw_connection()
            .execute("INSERT INTO \"nope\" (key, value) VALUES ('k', '2')", [])
            .unwrap_err();
        assert!(!is_primary_key_conflict(&missing_table));
    }

    #[test]
    fn keyword_table_names_are_quoted() {
        let store = SqliteStore::in_memory(["order", "select"]).unwrap();
        store.set("k", json!("v"), "order").unwrap();
        assert_eq!(store.get("k", "order").unwrap(), Some(json!("v")));
        assert!(store.all("select").unwrap().is_empty());
    }

    #[test]
    fn foreign_rows_are_readable() {
        let store = SqliteStore::in_memory(["main"]).unwrap();
        store
            .raw_connection()
            .execute_batch(
                "INSERT INTO \"main\" (key, value) VALUES ('plain', 'hello');
                 INSERT INTO \"main\" (key, value) VALUES ('nothing', NULL);",
            )
            .unwrap();
        assert_eq!(store.get("plain", "main").unwrap(), Some(json!("hello")));
        assert_eq!(store.get("nothing", "main").unwrap(), Some(Value::Null));
        assert!(store.has("nothing", "main").unwrap());
    }

    #[test]
    fn swallowed_failures_degrade_to_empty_results() {
        let store = SqliteStore::in_memory(["main"]).unwrap();
        store.set("k", json!(1), "main").unwrap();
        // Drop the relation behind the store's back so every statement fails.
        store
            .raw_connection()
            .execute_batch("DROP TABLE \"main\"")
            .unwrap();

        assert_eq!(store.get("k", "main").unwrap(), None);
        assert!(!store.has("k", "main").unwrap());
        assert!(!store.delete("k", "main").unwrap());
        assert!(store.all("main").unwrap().is_empty());
        assert!(matches!(
            store.set("k", json!(2), "main"),
            Err(StoreError::StorageWrite { ref table, .. }) if table == "main"
        ));
    }

    #[test]
    fn close_releases_the_connection() {
        let store = SqliteStore::in_memory(["main"]).unwrap();
        assert!(store.close().is_ok());
    }
}
