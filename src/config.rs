use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::narration::NarrationWindow;
use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "savepoint";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub main_branch: Option<String>,
    pub remote: String,
    pub default_window: NarrationWindow,
    pub workspace_root: PathBuf,
}

/// Values persisted by `savepoint config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub main_branch: Option<String>,
    pub remote: Option<String>,
    pub window_days: Option<String>,
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, |key| env::var(key).ok(), workspace_hint)
    }

    /// Layers environment overrides on top of the stored file.
    fn resolve(
        stored: StoredConfig,
        lookup: impl Fn(&str) -> Option<String>,
        workspace_hint: &Path,
    ) -> AppResult<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let main_branch =
            non_empty(lookup("SAVEPOINT_MAIN_BRANCH")).or(non_empty(stored.main_branch));
        let remote = non_empty(lookup("SAVEPOINT_REMOTE"))
            .or(non_empty(stored.remote))
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string());

        let window_days =
            non_empty(lookup("SAVEPOINT_WINDOW_DAYS")).or(non_empty(stored.window_days));
        let default_window = match window_days {
            Some(raw) => raw.parse::<NarrationWindow>().map_err(|err| {
                AppError::Configuration(format!("invalid default window '{raw}': {err}"))
            })?,
            None => NarrationWindow::default(),
        };

        Ok(Self {
            main_branch,
            remote,
            default_window,
            workspace_root: workspace_hint.to_path_buf(),
        })
    }
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<StoredConfig>(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(StoredConfig::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("could not locate a config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = AppConfig::resolve(StoredConfig::default(), env_of(&[]), Path::new("/repo"))
            .unwrap();
        assert_eq!(config.main_branch, None);
        assert_eq!(config.remote, "origin");
        assert_eq!(config.default_window.days(), 7);
        assert_eq!(config.workspace_root, PathBuf::from("/repo"));
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            main_branch: Some("trunk".to_string()),
            remote: Some("backup".to_string()),
            window_days: Some("14".to_string()),
        };
        let config = AppConfig::resolve(
            stored,
            env_of(&[("SAVEPOINT_MAIN_BRANCH", "main"), ("SAVEPOINT_WINDOW_DAYS", "30")]),
            Path::new("."),
        )
        .unwrap();
        assert_eq!(config.main_branch.as_deref(), Some("main"));
        assert_eq!(config.remote, "backup");
        assert_eq!(config.default_window.days(), 30);
    }

    #[test]
    fn rejects_invalid_window() {
        let result = AppConfig::resolve(
            StoredConfig::default(),
            env_of(&[("SAVEPOINT_WINDOW_DAYS", "0")]),
            Path::new("."),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn blank_values_are_ignored() {
        let stored = StoredConfig {
            main_branch: Some("  ".to_string()),
            remote: Some(String::new()),
            window_days: None,
        };
        let config = AppConfig::resolve(stored, env_of(&[]), Path::new(".")).unwrap();
        assert_eq!(config.main_branch, None);
        assert_eq!(config.remote, "origin");
    }
}
