use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::atoms::storage::file_watcher::FileEvent;
use crate::atoms::storage::paths::INDEX_FILE_NAME;

const SUPPRESSION_WINDOW_MS: u64 = 2000;

#[derive(Debug, PartialEq, Eq)]
pub enum FileChangeAction {
    ReloadIndex,
    ReloadContent { id: String },
    ContentRemoved { id: String },
    Suppressed,
}

/// Remembers which files the store itself just wrote so the watcher does
/// not bounce them back as external edits.
#[derive(Debug, Default)]
pub struct FileChangeTracker {
    save_timestamps: HashMap<String, Instant>,
}

impl FileChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `key` is a snippet id or the index file name.
    pub fn record_save(&mut self, key: &str) {
        self.save_timestamps.insert(key.to_string(), Instant::now());
    }

    pub fn record_index_save(&mut self) {
        self.record_save(INDEX_FILE_NAME);
    }

    fn should_suppress(&self, key: &str) -> bool {
        if let Some(timestamp) = self.save_timestamps.get(key) {
            timestamp.elapsed() < Duration::from_millis(SUPPRESSION_WINDOW_MS)
        } else {
            false
        }
    }

    pub fn cleanup(&mut self) {
        let cutoff = Duration::from_secs(10);
        self.save_timestamps.retain(|_, ts| ts.elapsed() < cutoff);
    }
}

fn extract_snippet_id(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}

pub fn classify_event(
    event: &FileEvent,
    tracker: &FileChangeTracker,
    known_ids: &[String],
) -> FileChangeAction {
    match event {
        FileEvent::IndexChanged => {
            if tracker.should_suppress(INDEX_FILE_NAME) {
                FileChangeAction::Suppressed
            } else {
                FileChangeAction::ReloadIndex
            }
        }
        FileEvent::ContentChanged(path) => match extract_snippet_id(path) {
            Some(id) if known_ids.contains(&id) && !tracker.should_suppress(&id) => {
                FileChangeAction::ReloadContent { id }
            }
            _ => FileChangeAction::Suppressed,
        },
        FileEvent::ContentRemoved(path) => match extract_snippet_id(path) {
            Some(id) if known_ids.contains(&id) && !tracker.should_suppress(&id) => {
                FileChangeAction::ContentRemoved { id }
            }
            _ => FileChangeAction::Suppressed,
        },
    }
}
