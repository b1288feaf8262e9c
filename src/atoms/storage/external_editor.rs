use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn resolve_editor() -> String {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string())
}

/// File extension for a VS Code language id, so the editor picks the
/// right highlighting. Unknown languages get `.txt`.
pub fn extension_for(language: Option<&str>) -> &'static str {
    match language.unwrap_or_default() {
        "rust" => "rs",
        "javascript" => "js",
        "typescript" => "ts",
        "javascriptreact" => "jsx",
        "typescriptreact" => "tsx",
        "python" => "py",
        "csharp" => "cs",
        "cpp" => "cpp",
        "c" => "c",
        "go" => "go",
        "java" => "java",
        "lua" => "lua",
        "shellscript" => "sh",
        "json" => "json",
        "html" => "html",
        "css" => "css",
        "markdown" => "md",
        "yaml" => "yaml",
        "glsl" => "glsl",
        "hlsl" => "hlsl",
        "gdscript" => "gd",
        _ => "txt",
    }
}

pub fn temp_path(snippet_id: &str, language: Option<&str>) -> PathBuf {
    std::env::temp_dir().join(format!(
        "gamenotebook_{}_{}.{}",
        std::process::id(),
        snippet_id,
        extension_for(language)
    ))
}

/// Runs the editor on `path` and waits for it. The command is split on
/// whitespace so `"code --wait"` works.
pub async fn spawn_editor(editor: &str, path: &Path) -> Result<bool> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("Empty editor command")?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .with_context(|| format!("Failed to spawn editor: {}", editor))?;

    Ok(status.success())
}

/// Round-trips `content` through `editor`. Returns the edited text, or
/// `None` when the editor exited with an error. The temp file is always
/// removed.
pub async fn edit_content(
    editor: &str,
    snippet_id: &str,
    language: Option<&str>,
    content: &str,
) -> Result<Option<String>> {
    let path = temp_path(snippet_id, language);
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write temp file: {:?}", path))?;

    let result = match spawn_editor(editor, &path).await {
        Ok(true) => fs::read_to_string(&path)
            .await
            .map(Some)
            .with_context(|| format!("Failed to read temp file: {:?}", path)),
        Ok(false) => Ok(None),
        Err(e) => Err(e),
    };

    if let Err(e) = fs::remove_file(&path).await {
        debug!("temp file {:?} not removed: {}", path, e);
    }
    result
}
