use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use super::paths::{APP_DATA_FILE_NAME, LEGACY_HISTORY_FILE_NAME};
use crate::types::AppData;

/// Reads `app.json`. Anything unreadable loads as an empty history.
pub async fn load_app_data(app_dir: &Path) -> AppData {
    let path = app_dir.join(APP_DATA_FILE_NAME);

    let text = match fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => {
            debug!("No app data at {:?}: {}", path, e);
            return load_legacy_history(app_dir).await;
        }
    };

    match serde_json::from_str(&text) {
        Ok(data) => data,
        Err(e) => {
            warn!("Ignoring unparseable {:?}: {}", path, e);
            AppData::default()
        }
    }
}

/// `folders.json` held a bare array of folder paths before `app.json` existed.
async fn load_legacy_history(app_dir: &Path) -> AppData {
    let path = app_dir.join(LEGACY_HISTORY_FILE_NAME);
    let Ok(text) = fs::read_to_string(&path).await else {
        return AppData::default();
    };

    match serde_json::from_str::<Vec<String>>(&text) {
        Ok(folders) => AppData { folders },
        Err(e) => {
            warn!("Ignoring unparseable {:?}: {}", path, e);
            AppData::default()
        }
    }
}

pub async fn save_app_data(app_dir: &Path, data: &AppData) -> Result<()> {
    fs::create_dir_all(app_dir)
        .await
        .with_context(|| format!("Failed to create app directory: {:?}", app_dir))?;

    let path = app_dir.join(APP_DATA_FILE_NAME);
    let content = serde_json::to_string(data).context("Failed to serialize app data")?;

    debug!("writing {:?}", path);
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write app data: {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_app_data(dir.path()).await;
        assert!(data.folders.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("a").join("b");
        let data = AppData {
            folders: vec!["/ws".to_string()],
        };

        save_app_data(&app_dir, &data).await.unwrap();
        let raw = std::fs::read_to_string(app_dir.join("app.json")).unwrap();
        assert_eq!(raw, r#"{"folders":["/ws"]}"#);
        assert_eq!(load_app_data(&app_dir).await, data);
    }

    #[tokio::test]
    async fn test_garbage_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.json"), "{not json").unwrap();
        assert!(load_app_data(dir.path()).await.folders.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_history_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("folders.json"), r#"["/old", "/older"]"#).unwrap();
        let data = load_app_data(dir.path()).await;
        assert_eq!(data.folders, vec!["/old", "/older"]);
    }
}
