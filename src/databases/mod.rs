#[cfg(feature = "json")]
pub mod json_store;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;
