use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, Debouncer, new_debouncer};
use tokio::sync::mpsc;

use super::paths::INDEX_FILE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    IndexChanged,
    ContentChanged(PathBuf),
    ContentRemoved(PathBuf),
}

pub struct FileWatcherHandle {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    pub receiver: mpsc::UnboundedReceiver<FileEvent>,
}

/// Maps a debounced path to an event. Hidden and dotted files (editor swap
/// files, `.tmp` leftovers) are never snippet bodies.
pub fn to_file_event(path: &Path, exists: bool) -> Option<FileEvent> {
    let name = path.file_name()?.to_string_lossy();
    if name == INDEX_FILE_NAME {
        return Some(FileEvent::IndexChanged);
    }
    if name.starts_with('.') || name.contains('.') || name.ends_with('~') {
        return None;
    }
    if exists {
        Some(FileEvent::ContentChanged(path.to_path_buf()))
    } else {
        Some(FileEvent::ContentRemoved(path.to_path_buf()))
    }
}

pub fn start_watcher(folder: &Path, debounce_ms: u64) -> Result<FileWatcherHandle> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        move |res: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
            if let Ok(events) = res {
                for event in events {
                    if event.kind != DebouncedEventKind::Any {
                        continue;
                    }
                    if let Some(file_event) = to_file_event(&event.path, event.path.exists()) {
                        let _ = tx.send(file_event);
                    }
                }
            }
        },
    )
    .with_context(|| "Failed to create file watcher")?;

    debouncer
        .watcher()
        .watch(folder, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch folder: {:?}", folder))?;

    Ok(FileWatcherHandle {
        _debouncer: debouncer,
        receiver: rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_event() {
        let event = to_file_event(Path::new("/ws/snippets.json"), true);
        assert_eq!(event, Some(FileEvent::IndexChanged));
        let event = to_file_event(Path::new("/ws/snippets.json"), false);
        assert_eq!(event, Some(FileEvent::IndexChanged));
    }

    #[test]
    fn test_content_events() {
        let path = Path::new("/ws/V1StGXR8_Z");
        assert_eq!(
            to_file_event(path, true),
            Some(FileEvent::ContentChanged(path.to_path_buf()))
        );
        assert_eq!(
            to_file_event(path, false),
            Some(FileEvent::ContentRemoved(path.to_path_buf()))
        );
    }

    #[test]
    fn test_ignores_temp_files() {
        assert_eq!(to_file_event(Path::new("/ws/.DS_Store"), true), None);
        assert_eq!(to_file_event(Path::new("/ws/snippets.json.tmp"), true), None);
        assert_eq!(to_file_event(Path::new("/ws/abc~"), true), None);
    }
}
