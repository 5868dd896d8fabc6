use crate::traits::Serializer;
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskboard_core::{KanbanError, KanbanResult};

/// Compact JSON, the same text `JSON.stringify` would produce for the value.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> KanbanResult<String> {
        serde_json::to_string(data).map_err(|e| KanbanError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> KanbanResult<T> {
        serde_json::from_str(text).map_err(|e| KanbanError::Serialization(e.to_string()))
    }
}
