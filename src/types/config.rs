use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Where `app.json` lives. Defaults to the config directory.
    #[serde(default)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

fn default_save_debounce_ms() -> u64 {
    250
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_file_watch")]
    pub file_watch: bool,
    #[serde(default = "default_file_watch_debounce_ms")]
    pub file_watch_debounce_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_file_watch() -> bool {
    true
}

fn default_file_watch_debounce_ms() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            file_watch: default_file_watch(),
            file_watch_debounce_ms: default_file_watch_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_vscode")]
    pub vscode: bool,
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
    /// Overrides the platform data directory that holds `Code/`.
    #[serde(default)]
    pub user_data_dir: Option<String>,
}

fn default_vscode() -> bool {
    true
}

fn default_export_file_name() -> String {
    "gamenotebook.code-snippets".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            vscode: default_vscode(),
            file_name: default_export_file_name(),
            user_data_dir: None,
        }
    }
}
