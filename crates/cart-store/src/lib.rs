pub mod error;
pub mod file;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use postgres::PostgresKeyValueStore;
pub use store::{KeyValueStore, KeyValueStoreExt};
