//! The fixed set of table names a store handle accepts.

use crate::errors::{StoreError, StoreResult};

/// Table provisioned when none are declared.
pub const DEFAULT_TABLE: &str = "main";

/// Validated, ordered, duplicate-free list of table names.
///
/// Names double as file stems and SQL identifiers, so only
/// `[A-Za-z_][A-Za-z0-9_]*` is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSet {
    names: Vec<String>,
}

impl TableSet {
    /// Validate the declared names. An empty list yields `["main"]`.
    pub fn new<I, S>(names: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validated: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if !is_valid_table_name(name) {
                return Err(StoreError::InvalidTableName(name.to_owned()));
            }
            if !validated.iter().any(|existing| existing == name) {
                validated.push(name.to_owned());
            }
        }
        if validated.is_empty() {
            validated.push(DEFAULT_TABLE.to_owned());
        }
        Ok(Self { names: validated })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, table: &str) -> bool {
        self.names.iter().any(|name| name == table)
    }

    /// Fails with [`StoreError::InvalidTable`] for an unprovisioned name.
    pub fn check(&self, table: &str) -> StoreResult<()> {
        if self.contains(table) {
            Ok(())
        } else {
            Err(StoreError::InvalidTable(table.to_owned()))
        }
    }
}

pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
