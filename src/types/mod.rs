mod app_data;
mod config;
mod export;
mod snippet;

pub use app_data::{AppData, FOLDER_HISTORY_RETAINED};
pub use config::{Config, EditorConfig, ExportConfig, GeneralConfig, WatchConfig};
pub use export::{ExportEntry, split_prefix};
pub use snippet::{
    DEFAULT_LANGUAGE, DEFAULT_SNIPPET_NAME, NewSnippet, Snippet, SnippetField, VscodeSnippet,
};
