use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::paths::content_path;

/// Reads a snippet body. `Ok(None)` when the file does not exist.
pub async fn load_content(folder: &Path, id: &str) -> Result<Option<String>> {
    let path = content_path(folder, id);

    match fs::read_to_string(&path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read snippet: {:?}", path)),
    }
}

pub async fn save_content(folder: &Path, id: &str, content: &str) -> Result<()> {
    let path = content_path(folder, id);

    debug!("writing {:?}", path);
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to save snippet: {:?}", path))?;

    Ok(())
}

pub async fn delete_content(folder: &Path, id: &str) -> Result<()> {
    let path = content_path(folder, id);

    match fs::remove_file(&path).await {
        Ok(()) => {
            debug!("removed {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to delete snippet: {:?}", path)),
    }
}
