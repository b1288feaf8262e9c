pub mod actions;
mod folder_sync;
pub mod prompt;
mod store;

pub use folder_sync::{FolderSync, SyncTrigger};
pub use prompt::{Confirm, LogNotifier, Notifier, StderrNotifier, TerminalConfirm};
pub use store::{FolderLoad, MISSING_FOLDER_NOTICE, SnippetStore, StoreState};
