use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, info};

use crate::atoms::storage::paths::{VSCODE_DIR_NAME, folder_name, vscode_snippets_dir};
use crate::atoms::storage::{expand_tilde, load_content, path_exists, resolve_user_data_dir};
use crate::types::{ExportConfig, ExportEntry, Snippet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// VS Code is not installed for this user.
    Skipped,
    Written { entries: usize },
}

/// Keeps one `.code-snippets` bundle in the VS Code user profile in step
/// with every folder that has been synced into it.
#[derive(Debug, Clone)]
pub struct VscodeExporter {
    user_data_dir: PathBuf,
    file_name: String,
}

impl VscodeExporter {
    pub fn new(user_data_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            user_data_dir: user_data_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// `None` when export is switched off or there is no data directory.
    pub fn from_config(config: &ExportConfig) -> Option<Self> {
        if !config.vscode {
            return None;
        }
        let user_data_dir = match config.user_data_dir.as_deref() {
            Some(dir) => expand_tilde(dir),
            None => resolve_user_data_dir(None)?,
        };
        Some(Self::new(user_data_dir, config.file_name.clone()))
    }

    pub fn bundle_path(&self) -> PathBuf {
        vscode_snippets_dir(&self.user_data_dir).join(&self.file_name)
    }

    /// Replaces every entry previously exported from `folder` with the
    /// folder's current prefixed, non-trashed snippets. Nothing is written
    /// unless every body could be read.
    pub async fn sync(&self, folder: &Path, snippets: &[Snippet]) -> Result<SyncOutcome> {
        if !path_exists(VSCODE_DIR_NAME, Some(&self.user_data_dir)).await {
            debug!("VS Code not found under {:?}, skipping export", self.user_data_dir);
            return Ok(SyncOutcome::Skipped);
        }

        let name = folder_name(folder);
        let entries = build_entries(folder, &name, snippets).await?;
        let count = entries.len();

        let path = self.bundle_path();
        let existing = read_bundle(&path).await?;
        let bundle = merge_bundle(existing, &name, entries)?;

        let dir = vscode_snippets_dir(&self.user_data_dir);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create snippets directory: {:?}", dir))?;

        let content =
            serde_json::to_string_pretty(&bundle).context("Failed to serialize snippet bundle")?;
        info!("writing {:?} ({} entries from {})", path, count, name);
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write snippet bundle: {:?}", path))?;

        Ok(SyncOutcome::Written { entries: count })
    }
}

/// Entries for every active snippet carrying a non-blank prefix, keyed by
/// display name. A later snippet with the same name wins.
pub async fn build_entries(
    folder: &Path,
    folder_name: &str,
    snippets: &[Snippet],
) -> Result<BTreeMap<String, ExportEntry>> {
    let mut entries = BTreeMap::new();

    for snippet in snippets {
        if snippet.is_trashed() {
            continue;
        }
        let Some(prefix) = snippet.trimmed_export_prefix() else {
            continue;
        };

        let content = load_content(folder, &snippet.id)
            .await?
            .ok_or_else(|| anyhow!("Snippet content not found: {}", snippet.id))?;

        entries.insert(
            snippet.name.clone(),
            ExportEntry::new(prefix, content, folder_name),
        );
    }

    Ok(entries)
}

async fn read_bundle(path: &Path) -> Result<Map<String, Value>> {
    if !path_exists(path, None).await {
        return Ok(Map::new());
    }

    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snippet bundle: {:?}", path))?;

    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse snippet bundle: {:?}", path))
}

/// Drops whatever `folder_name` exported last time, then adds `entries`.
/// Entries from other folders, or written by hand, are kept as they are.
pub fn merge_bundle(
    mut bundle: Map<String, Value>,
    folder_name: &str,
    entries: BTreeMap<String, ExportEntry>,
) -> Result<Map<String, Value>> {
    bundle.retain(|_, value| {
        value.get("__folderName").and_then(Value::as_str) != Some(folder_name)
    });

    for (name, entry) in entries {
        let value = serde_json::to_value(entry).context("Failed to serialize snippet entry")?;
        bundle.insert(name, value);
    }

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewSnippet, SnippetField};
    use chrono::Utc;
    use serde_json::json;

    fn snippet(id: &str, name: &str, prefix: Option<&str>) -> Snippet {
        Snippet::new(
            id.to_string(),
            NewSnippet {
                name: name.to_string(),
                language: None,
                export_prefix: prefix.map(String::from),
            },
        )
    }

    #[tokio::test]
    async fn test_build_entries_skips_blank_and_trashed() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["a", "b", "c", "d"] {
            std::fs::write(dir.path().join(id), format!("body {}", id)).unwrap();
        }
        let mut trashed = snippet("c", "Trashed", Some("tr"));
        trashed.apply(SnippetField::DeletedAt(Some(Utc::now())));
        let snippets = vec![
            snippet("a", "Log", Some("log, clg")),
            snippet("b", "Blank", Some("   ")),
            trashed,
            snippet("d", "None", None),
        ];

        let entries = build_entries(dir.path(), "ws", &snippets).await.unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries["Log"];
        assert_eq!(entry.prefix, vec!["log", "clg"]);
        assert_eq!(entry.body, vec!["body a"]);
        assert_eq!(entry.folder_name, "ws");
    }

    #[tokio::test]
    async fn test_build_entries_fails_on_missing_body() {
        let dir = tempfile::tempdir().unwrap();
        let snippets = vec![snippet("gone", "Gone", Some("g"))];
        assert!(build_entries(dir.path(), "ws", &snippets).await.is_err());
    }

    #[test]
    fn test_merge_replaces_only_own_folder() {
        let existing = json!({
            "Old": { "scope": "", "prefix": ["o"], "body": ["x"], "__folderName": "ws" },
            "Other": { "scope": "", "prefix": ["t"], "body": ["y"], "__folderName": "elsewhere" },
            "Handwritten": { "prefix": "hw", "body": ["z"] }
        });
        let Value::Object(existing) = existing else {
            unreachable!()
        };
        let mut entries = BTreeMap::new();
        entries.insert(
            "New".to_string(),
            ExportEntry::new("n", "new body".to_string(), "ws"),
        );

        let merged = merge_bundle(existing, "ws", entries).unwrap();
        assert!(!merged.contains_key("Old"));
        assert!(merged.contains_key("Other"));
        assert!(merged.contains_key("Handwritten"));
        assert_eq!(merged["New"]["prefix"], json!(["n"]));
    }

    #[tokio::test]
    async fn test_sync_skipped_without_vscode() {
        let data = tempfile::tempdir().unwrap();
        let folder = tempfile::tempdir().unwrap();
        let exporter = VscodeExporter::new(data.path(), "test.code-snippets");

        let outcome = exporter.sync(folder.path(), &[]).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Skipped);
        assert!(!exporter.bundle_path().exists());
    }

    #[tokio::test]
    async fn test_sync_writes_pretty_bundle() {
        let data = tempfile::tempdir().unwrap();
        std::fs::create_dir(data.path().join("Code")).unwrap();
        let folder = tempfile::tempdir().unwrap();
        std::fs::write(folder.path().join("a"), "console.log($1)").unwrap();
        let exporter = VscodeExporter::new(data.path(), "test.code-snippets");

        let outcome = exporter
            .sync(folder.path(), &[snippet("a", "Log", Some("log"))])
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Written { entries: 1 });

        let raw = std::fs::read_to_string(exporter.bundle_path()).unwrap();
        assert!(raw.contains("\n  \"Log\": {"));
        let bundle: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(bundle["Log"]["body"], json!(["console.log($1)"]));
    }

    #[test]
    fn test_from_config_disabled() {
        let config = ExportConfig {
            vscode: false,
            ..ExportConfig::default()
        };
        assert!(VscodeExporter::from_config(&config).is_none());
    }
}
