mod app_data_io;
mod config_io;
mod content_io;
mod external_editor;
pub mod file_watcher;
mod index_io;
pub mod paths;

pub use app_data_io::{load_app_data, save_app_data};
pub use config_io::{
    config_dir, ensure_config_dir, expand_tilde, load_config, resolve_data_dir,
    resolve_user_data_dir, save_config,
};
pub use content_io::{delete_content, load_content, save_content};
pub use external_editor::{edit_content, extension_for, resolve_editor, spawn_editor, temp_path};
pub use index_io::{load_index, save_index};
pub use paths::path_exists;
