pub mod file_change_handler;
mod snippet_list;

pub use file_change_handler::{FileChangeAction, FileChangeTracker, classify_event};
pub use snippet_list::{ListView, SnippetList, compare_snippets};
