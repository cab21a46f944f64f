//! Loading and replacing whole table documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::config::StoreConfig;
use crate::errors::StorageFailure;

/// How documents are written back to disk.
#[derive(Debug, Clone, Copy)]
pub(super) struct WriteOptions {
    pub atomic: bool,
    pub fsync: bool,
    pub pretty: bool,
}

impl From<&StoreConfig> for WriteOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            atomic: config.atomic_writes,
            fsync: config.use_fsync,
            pretty: config.pretty,
        }
    }
}

/// Read and parse a table document.
///
/// A zero-length (or whitespace-only) file is the empty document. A document
/// whose root is not an object is rejected.
pub(super) fn load(path: &Path) -> Result<Map<String, Value>, StorageFailure> {
    let bytes = fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageFailure::Other(format!(
            "document root is {}, expected an object",
            kind_of(&other)
        ))),
    }
}

/// Overwrite the whole document at `path`.
///
/// With `atomic` set, the document is written to a sibling temp file and
/// renamed over `path`, so readers see either the old or the new document.
pub(super) fn replace(
    path: &Path,
    document: &Map<String, Value>,
    options: WriteOptions,
) -> Result<(), StorageFailure> {
    let bytes = if options.pretty {
        serde_json::to_vec_pretty(document)?
    } else {
        serde_json::to_vec(document)?
    };

    if !options.atomic {
        fs::write(path, &bytes)?;
        return Ok(());
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&bytes)?;
    if options.fsync {
        staged.as_file().sync_all()?;
    }
    staged.persist(path)?;
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OPTIONS: WriteOptions = WriteOptions {
        atomic: true,
        fsync: false,
        pretty: false,
    };

    #[test]
    fn empty_file_is_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(&path, "").unwrap();
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn non_object_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(&path, "[1, 2]").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("an array"), "{err}");
    }

    #[test]
    fn replace_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        let doc = json!({ "k": "v" });
        replace(&path, doc.as_object().unwrap(), OPTIONS).unwrap();
        replace(&path, doc.as_object().unwrap(), OPTIONS).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"k":"v"}"#);
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn pretty_documents_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        let doc = json!({ "a": { "b": [1, 2] } });
        let options = WriteOptions {
            pretty: true,
            atomic: false,
            ..OPTIONS
        };
        replace(&path, doc.as_object().unwrap(), options).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains('\n'));
        assert_eq!(Value::Object(load(&path).unwrap()), doc);
    }
}
