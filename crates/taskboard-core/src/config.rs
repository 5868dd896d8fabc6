use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DRAG_ACTIVATION_DISTANCE: u16 = 2;
const DEFAULT_SUBMIT_DELAY_MS: u64 = 300;
const DEFAULT_DATA_FILE: &str = "board.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the board's key-value storage file lives.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Pointer travel, in terminal cells, before a press becomes a drag.
    #[serde(default)]
    pub drag_activation_distance: Option<u16>,
    /// Loading affordance shown while a create/edit form is being saved.
    #[serde(default)]
    pub submit_delay_ms: Option<u64>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing or unreadable config files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn effective_data_file(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("taskboard").join(DEFAULT_DATA_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    pub fn effective_drag_activation_distance(&self) -> u16 {
        self.drag_activation_distance
            .unwrap_or(DEFAULT_DRAG_ACTIVATION_DISTANCE)
    }

    pub fn effective_submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.effective_drag_activation_distance(), 2);
        assert_eq!(config.effective_submit_delay(), Duration::from_millis(300));
        assert!(config.effective_data_file().ends_with("board.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_file = \"/tmp/tasks.json\"\nsubmit_delay_ms = 0\ndrag_activation_distance = 4\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.effective_data_file(), PathBuf::from("/tmp/tasks.json"));
        assert_eq!(config.effective_submit_delay(), Duration::ZERO);
        assert_eq!(config.effective_drag_activation_distance(), 4);
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "submit_delay_ms = \"soon\"").unwrap();

        let config = AppConfig::load_from(&path);
        assert!(config.submit_delay_ms.is_none());
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert!(config.data_file.is_none());
    }
}
