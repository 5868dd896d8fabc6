use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error on key '{key}': {reason}")]
    Storage { key: String, reason: String },
}

impl KanbanError {
    pub fn storage(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_message_names_key() {
        let err = KanbanError::storage("kanban-tasks", "quota exceeded");
        assert_eq!(
            err.to_string(),
            "Storage error on key 'kanban-tasks': quota exceeded"
        );
    }
}
