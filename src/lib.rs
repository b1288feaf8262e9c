//! gamenotebook keeps a folder of code snippets: a `snippets.json` index
//! plus one file per snippet body. It handles the trash lifecycle, debounced
//! saves, change detection, and mirrors prefixed snippets into VS Code's
//! user snippets.

pub mod atoms;
pub mod coordinator;
pub mod error;
pub mod molecules;
pub mod types;

pub use coordinator::{FolderLoad, SnippetStore, StoreState};
pub use error::{StoreError, StoreResult};
