pub mod store_ops;

// Re-export commonly used types
pub use store_ops::{Entry, KeyModel, KvStore, KvStoreExt};
