use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use super::debounce::Debouncer;

/// Debounced save pipeline for the snippet that is open in the editor.
pub struct ContentAutosave {
    snippet_id: String,
    saved: String,
    debouncer: Option<Debouncer<String>>,
    settled: mpsc::UnboundedReceiver<String>,
}

impl ContentAutosave {
    pub fn new(snippet_id: impl Into<String>, saved: impl Into<String>, delay: Duration) -> Self {
        let (debouncer, settled) = Debouncer::new(delay);
        Self {
            snippet_id: snippet_id.into(),
            saved: saved.into(),
            debouncer: Some(debouncer),
            settled,
        }
    }

    pub fn snippet_id(&self) -> &str {
        &self.snippet_id
    }

    pub fn saved_content(&self) -> &str {
        &self.saved
    }

    /// Editor change callback.
    pub fn edit(&self, content: impl Into<String>) {
        if let Some(ref debouncer) = self.debouncer {
            debouncer.push(content.into());
        }
    }

    /// Content reloaded from disk becomes the new baseline.
    pub fn reset(&mut self, content: impl Into<String>) {
        self.saved = content.into();
    }

    /// Stops accepting edits; anything still pending is flushed.
    pub fn close(&mut self) {
        self.debouncer = None;
    }

    /// Next settled content that differs from what was last saved. `None`
    /// once closed and drained.
    pub async fn next_save(&mut self) -> Option<String> {
        while let Some(content) = self.settled.recv().await {
            if content == self.saved {
                debug!("content of {} unchanged, skipping save", self.snippet_id);
                continue;
            }
            self.saved = content.clone();
            return Some(content);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_content_is_skipped() {
        let mut autosave = ContentAutosave::new("a", "hello", Duration::from_millis(250));
        autosave.edit("hello!");
        autosave.edit("hello");
        autosave.close();

        assert_eq!(autosave.next_save().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_edit_is_saved_once() {
        let mut autosave = ContentAutosave::new("a", "", Duration::from_millis(250));
        autosave.edit("f");
        autosave.edit("fn");
        autosave.edit("fn main");

        assert_eq!(autosave.next_save().await.as_deref(), Some("fn main"));
        assert_eq!(autosave.saved_content(), "fn main");

        autosave.edit("fn main");
        autosave.close();
        assert_eq!(autosave.next_save().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_moves_baseline() {
        let mut autosave = ContentAutosave::new("a", "old", Duration::from_millis(10));
        autosave.reset("from disk");
        autosave.edit("from disk");
        autosave.close();
        assert_eq!(autosave.next_save().await, None);
    }
}
