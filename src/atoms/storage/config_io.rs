use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Config;

pub fn config_dir() -> PathBuf {
    // ~/.config/gamenotebook on Unix-like systems so dotfile managers pick it up
    if let Some(home) = dirs::home_dir() {
        let xdg_config = home.join(".config").join("gamenotebook");
        if xdg_config.exists() || cfg!(unix) {
            return xdg_config;
        }
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gamenotebook")
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

pub fn ensure_config_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
    }
    Ok(())
}

/// Loads `config.toml` from `dir`, writing the defaults on first run.
pub fn load_config(dir: &Path) -> Result<Config> {
    let path = config_path(dir);

    if !path.exists() {
        let config = Config::default();
        save_config(dir, &config)?;
        return Ok(config);
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read config: {:?}", path))?;

    let config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    Ok(config)
}

pub fn save_config(dir: &Path, config: &Config) -> Result<()> {
    ensure_config_dir(dir)?;
    let path = config_path(dir);

    let content = toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;

    fs::write(&path, content).with_context(|| format!("Failed to write config: {:?}", path))?;

    Ok(())
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

/// Directory holding `app.json`.
pub fn resolve_data_dir(data_dir: Option<&str>) -> PathBuf {
    match data_dir {
        Some(dir) => expand_tilde(dir),
        None => config_dir(),
    }
}

/// Platform data directory that VS Code's `Code/` folder lives in.
pub fn resolve_user_data_dir(user_data_dir: Option<&str>) -> Option<PathBuf> {
    match user_data_dir {
        Some(dir) => Some(expand_tilde(dir)),
        None => dirs::data_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.save_debounce_ms, 250);
        assert_eq!(config.watch.poll_interval_ms, 2000);
        assert!(config.watch.file_watch);
        assert!(config.export.vscode);
        assert_eq!(config.export.file_name, "gamenotebook.code-snippets");
    }

    #[test]
    fn test_config_dir_xdg() {
        let dir = config_dir();
        if cfg!(unix) {
            assert!(dir.to_string_lossy().contains(".config/gamenotebook"));
        }
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = load_config(&nested).unwrap();
        assert_eq!(config.editor.save_debounce_ms, 250);
        assert!(config_path(&nested).exists());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            config_path(dir.path()),
            "[watch]\nfile_watch = false\n[export]\nvscode = false\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert!(!config.watch.file_watch);
        assert_eq!(config.watch.poll_interval_ms, 2000);
        assert!(!config.export.vscode);
        assert_eq!(config.export.file_name, "gamenotebook.code-snippets");
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Documents/snippets");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("Documents/snippets"));
        }
    }

    #[test]
    fn test_expand_tilde_no_prefix() {
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_resolve_data_dir_custom() {
        let resolved = resolve_data_dir(Some("/tmp/gamenotebook-test"));
        assert_eq!(resolved, PathBuf::from("/tmp/gamenotebook-test"));
    }

    #[test]
    fn test_resolve_data_dir_none_falls_back() {
        assert_eq!(resolve_data_dir(None), config_dir());
    }

    #[test]
    fn test_resolve_user_data_dir_custom() {
        let resolved = resolve_user_data_dir(Some("/tmp/vscode-data"));
        assert_eq!(resolved, Some(PathBuf::from("/tmp/vscode-data")));
    }
}
