use std::io::Write;
use std::path::Path;
use taskboard_core::{KanbanError, KanbanResult};

/// Writes go to a temp file in the target's directory which is then renamed
/// over the target, so readers see either the old or the new contents.
pub struct AtomicWriter;

impl AtomicWriter {
    pub fn write_atomic(path: &Path, data: &[u8]) -> KanbanResult<()> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(data)?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(path)
            .map_err(|e| KanbanError::Io(e.error))?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    /// `None` when the file does not exist.
    pub fn read_to_string(path: &Path) -> KanbanResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::debug!("Read {} bytes from {}", text.len(), path.display());
                Ok(Some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
