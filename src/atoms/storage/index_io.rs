use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use super::paths::index_path;
use crate::types::Snippet;

/// Reads a folder's `snippets.json`. Missing, empty or corrupt files all
/// read as a folder with no snippets.
pub async fn load_index(folder: &Path) -> Vec<Snippet> {
    let path = index_path(folder);

    let text = match fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => {
            debug!("No index at {:?}: {}", path, e);
            return Vec::new();
        }
    };

    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str(&text) {
        Ok(snippets) => snippets,
        Err(e) => {
            warn!("Treating unparseable {:?} as empty: {}", path, e);
            Vec::new()
        }
    }
}

/// Rewrites the whole index. Last writer wins.
pub async fn save_index(folder: &Path, snippets: &[Snippet]) -> Result<()> {
    let path = index_path(folder);
    let content = serde_json::to_string(snippets).context("Failed to serialize snippets")?;

    debug!("writing {:?} ({} snippets)", path, snippets.len());
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write index: {:?}", path))?;

    Ok(())
}
