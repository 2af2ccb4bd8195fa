//! Backend settings.

use std::path::Path;

use tauri::State;

use crate::backend::{BackendClient, BackendConfig};
use crate::AppState;

use super::{CommandError, CommandResult};

/// Validate and persist a new base URL. Returns the normalized config.
fn persist_base_url(data_dir: &Path, base_url: String) -> Result<BackendConfig, CommandError> {
    let base_url = base_url.trim_end_matches('/').to_string();
    BackendClient::new(base_url.clone()).map_err(|e| CommandError::new(e.to_string()))?;

    let config = BackendConfig { base_url };
    config.save(data_dir).map_err(|e| {
        log::error!("Failed to save config: {}", e);
        CommandError::new("Failed to save settings")
    })?;
    Ok(config)
}

#[tauri::command]
pub fn get_backend_url(state: State<AppState>) -> CommandResult<String> {
    Ok(BackendConfig::load(&state.data_dir).base_url)
}

/// Persist a new backend base URL. The running client keeps its current
/// target; the new URL takes effect on the next launch.
#[tauri::command]
pub fn set_backend_url(state: State<AppState>, base_url: String) -> CommandResult<String> {
    let config = persist_base_url(&state.data_dir, base_url)?;
    Ok(config.base_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persist_rejects_invalid_url() {
        let dir = TempDir::new().unwrap();
        assert!(persist_base_url(dir.path(), "ftp://example.com".to_string()).is_err());
        assert!(!BackendConfig::config_path(dir.path()).exists());
    }

    #[test]
    fn test_persist_normalizes_and_reloads() {
        let dir = TempDir::new().unwrap();
        persist_base_url(dir.path(), "https://study.example.com/".to_string()).unwrap();
        let loaded = BackendConfig::load(dir.path());
        assert_eq!(loaded.base_url, "https://study.example.com");
    }
}
