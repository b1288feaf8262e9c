use std::path::{Path, PathBuf};

pub const INDEX_FILE_NAME: &str = "snippets.json";
pub const APP_DATA_FILE_NAME: &str = "app.json";
pub const LEGACY_HISTORY_FILE_NAME: &str = "folders.json";

/// Directory VS Code keeps under the platform data directory.
pub const VSCODE_DIR_NAME: &str = "Code";

/// Resolves `path` against `base` when given. I/O errors read as "missing".
pub async fn path_exists(path: impl AsRef<Path>, base: Option<&Path>) -> bool {
    let full = match base {
        Some(base) => base.join(path),
        None => path.as_ref().to_path_buf(),
    };
    tokio::fs::try_exists(&full).await.unwrap_or(false)
}

pub fn index_path(folder: &Path) -> PathBuf {
    folder.join(INDEX_FILE_NAME)
}

/// Content files sit flat in the folder, named exactly by the snippet id.
pub fn content_path(folder: &Path, id: &str) -> PathBuf {
    folder.join(id)
}

/// Last path component, used to tag exported entries.
pub fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.to_string_lossy().to_string())
}

pub fn vscode_snippets_dir(user_data_dir: &Path) -> PathBuf {
    user_data_dir.join(VSCODE_DIR_NAME).join("User").join("snippets")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_path_exists_with_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Code")).unwrap();

        assert!(path_exists("Code", Some(dir.path())).await);
        assert!(!path_exists("Nope", Some(dir.path())).await);
        assert!(path_exists(dir.path(), None).await);
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(folder_name(Path::new("/home/me/snips")), "snips");
        assert_eq!(folder_name(Path::new("/home/me/snips/")), "snips");
    }

    #[test]
    fn test_vscode_snippets_dir() {
        let dir = vscode_snippets_dir(Path::new("/data"));
        assert_eq!(dir, PathBuf::from("/data/Code/User/snippets"));
    }
}
