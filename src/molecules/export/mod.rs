mod vscode;

pub use vscode::{SyncOutcome, VscodeExporter, build_entries, merge_bundle};
