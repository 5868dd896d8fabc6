pub mod adapter;
pub mod serialization;
pub mod store;
pub mod traits;

pub use adapter::{LocalStorageAdapter, COLUMN_ORDER_KEY, TASKS_KEY};
pub use serialization::JsonSerializer;
pub use store::{AtomicWriter, FileKeyValueStore, MemoryKeyValueStore};
pub use traits::{KeyValueStore, Serializer};
