use std::path::PathBuf;
use taskboard_core::AppConfig;
use taskboard_domain::TaskStore;
use taskboard_persistence::{FileKeyValueStore, LocalStorageAdapter};

pub type FileBoard = TaskStore<LocalStorageAdapter<FileKeyValueStore>>;

/// Resolves the data file: `--file` / `TASKBOARD_FILE` first, then the
/// config file, then the platform data directory.
pub fn data_file(cli_file: Option<&str>, config: &AppConfig) -> PathBuf {
    cli_file
        .map(PathBuf::from)
        .unwrap_or_else(|| config.effective_data_file())
}

pub fn open_board(path: PathBuf) -> FileBoard {
    tracing::debug!("Opening board at {}", path.display());
    TaskStore::open(LocalStorageAdapter::new(FileKeyValueStore::new(path)))
}
