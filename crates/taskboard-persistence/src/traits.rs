use serde::de::DeserializeOwned;
use serde::Serialize;
use taskboard_core::KanbanResult;

/// A string-keyed, string-valued storage area, shaped like a browser's
/// local storage. Values are opaque text to the medium.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> KanbanResult<Option<String>>;

    /// Overwrites any previous value under `key`.
    fn set(&self, key: &str, value: &str) -> KanbanResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> KanbanResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KanbanResult<()> {
        (**self).set(key, value)
    }
}

/// Text serialization strategy for values written to a [`KeyValueStore`].
///
/// Serialization borrows, so slices and views over session state are written
/// without being collected first.
pub trait Serializer {
    fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> KanbanResult<String>;

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> KanbanResult<T>;
}
