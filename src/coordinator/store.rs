use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::atoms::storage::file_watcher::FileEvent;
use crate::atoms::storage::{
    delete_content, load_app_data, load_content, load_index, path_exists, resolve_data_dir,
    save_app_data, save_content, save_index,
};
use crate::coordinator::folder_sync::SyncTrigger;
use crate::coordinator::prompt::{LogNotifier, Notifier};
use crate::error::{StoreError, StoreResult};
use crate::molecules::export::{SyncOutcome, VscodeExporter};
use crate::molecules::list::{FileChangeAction, FileChangeTracker, classify_event};
use crate::types::{AppData, Config, NewSnippet, Snippet, SnippetField};

pub const MISSING_FOLDER_NOTICE: &str = "A 'Workspace' folder doesn't exist";

/// Everything a view needs to render. Observers get a fresh copy after
/// every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub ready: bool,
    pub app: AppData,
    pub folder: Option<PathBuf>,
    pub snippets: Vec<Snippet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderLoad {
    Loaded { snippets: usize },
    /// The folder is gone; it was dropped from the history.
    Missing,
}

/// Owns the open folder's snippets. Every mutation goes through here and
/// rewrites the folder's whole index.
///
/// There is no locking: calls are expected to come from one task, and two
/// overlapping writers leave whichever index was written last.
pub struct SnippetStore {
    state: StoreState,
    app_dir: PathBuf,
    exporter: Option<VscodeExporter>,
    notifier: Box<dyn Notifier>,
    tracker: FileChangeTracker,
    observers: watch::Sender<StoreState>,
}

fn folder_key(folder: &Path) -> String {
    folder.to_string_lossy().into_owned()
}

impl SnippetStore {
    pub fn new(app_dir: impl Into<PathBuf>, exporter: Option<VscodeExporter>) -> Self {
        let (observers, _) = watch::channel(StoreState::default());
        Self {
            state: StoreState::default(),
            app_dir: app_dir.into(),
            exporter,
            notifier: Box::new(LogNotifier),
            tracker: FileChangeTracker::new(),
            observers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let app_dir = resolve_data_dir(config.general.data_dir.as_deref());
        Self::new(app_dir, VscodeExporter::from_config(&config.export))
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn folder(&self) -> Option<&Path> {
        self.state.folder.as_deref()
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.state.snippets
    }

    pub fn snippet(&self, id: &str) -> Option<&Snippet> {
        self.state.snippets.iter().find(|s| s.id == id)
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.observers.subscribe()
    }

    fn publish(&self) {
        self.observers.send_replace(self.state.clone());
    }

    /// Loads the folder history. Call once at start-up.
    pub async fn init(&mut self) {
        self.state.app = load_app_data(&self.app_dir).await;
        self.state.ready = true;
        self.publish();
    }

    /// Selects the folder later operations act on, without reading it.
    pub fn set_folder(&mut self, folder: Option<PathBuf>) {
        self.state.folder = folder;
        self.publish();
    }

    pub async fn remove_folder_from_history(&mut self, folder: &Path) -> StoreResult<()> {
        self.state.app.remove_folder(&folder_key(folder));
        self.publish();
        save_app_data(&self.app_dir, &self.state.app).await?;
        Ok(())
    }

    pub async fn load_folder(&mut self, folder: &Path) -> StoreResult<FolderLoad> {
        let key = folder_key(folder);

        if !path_exists(folder, None).await {
            self.state.app.remove_folder(&key);
            self.publish();
            save_app_data(&self.app_dir, &self.state.app).await?;
            self.notifier.notify(MISSING_FOLDER_NOTICE);
            return Ok(FolderLoad::Missing);
        }

        let snippets = load_index(folder).await;
        let count = snippets.len();
        debug!("loaded {} snippets from {:?}", count, folder);

        self.state.snippets = snippets;
        self.state.folder = Some(folder.to_path_buf());
        self.state.app.touch_folder(&key);
        self.publish();

        save_app_data(&self.app_dir, &self.state.app).await?;

        Ok(FolderLoad::Loaded { snippets: count })
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if self.snippet(&id).is_none() {
                return id;
            }
        }
    }

    /// Returns the new snippet's id, or `None` when no folder is open.
    pub async fn create_snippet(
        &mut self,
        fields: NewSnippet,
        content: &str,
    ) -> StoreResult<Option<String>> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(None);
        };

        let id = self.next_id();
        self.tracker.record_save(&id);
        save_content(&folder, &id, content).await?;

        let mut snippets = self.state.snippets.clone();
        snippets.push(Snippet::new(id.clone(), fields));
        self.tracker.record_index_save();
        save_index(&folder, &snippets).await?;

        self.state.snippets = snippets;
        self.publish();
        info!("created snippet {}", id);

        Ok(Some(id))
    }

    /// Empty string when no folder is open.
    pub async fn read_snippet_content(&self, id: &str) -> StoreResult<String> {
        let Some(folder) = self.folder() else {
            return Ok(String::new());
        };

        load_content(folder, id)
            .await?
            .ok_or_else(|| StoreError::ContentNotFound { id: id.to_string() })
    }

    async fn write_index(&mut self, folder: &Path) -> StoreResult<()> {
        self.tracker.record_index_save();
        save_index(folder, &self.state.snippets).await?;
        Ok(())
    }

    /// Sets one field, stamps `updatedAt`, rewrites the index and exports.
    /// Unknown ids are skipped.
    pub async fn update_snippet(&mut self, id: &str, field: SnippetField) -> StoreResult<()> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(());
        };
        let Some(snippet) = self.state.snippets.iter_mut().find(|s| s.id == id) else {
            debug!("update of unknown snippet {} skipped", id);
            return Ok(());
        };

        debug!("updating {} of {}", field.as_str(), id);
        snippet.apply(field);
        snippet.updated_at = Utc::now();
        self.publish();

        self.write_index(&folder).await?;
        self.sync_snippets_to_vscode().await?;
        Ok(())
    }

    /// Writes the body, then stamps the index. The two writes are not atomic:
    /// a crash in between leaves new content with the old `updatedAt`.
    pub async fn update_snippet_content(&mut self, id: &str, content: &str) -> StoreResult<()> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(());
        };

        self.tracker.record_save(id);
        save_content(&folder, id, content).await?;

        self.update_snippet(id, SnippetField::UpdatedAt(Utc::now()))
            .await
    }

    /// Sets (or with `restore`, clears) `deletedAt` on every listed snippet.
    /// `updatedAt` is left alone.
    pub async fn move_snippets_to_trash(&mut self, ids: &[String], restore: bool) -> StoreResult<()> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(());
        };

        let now = Utc::now();
        for snippet in self.state.snippets.iter_mut() {
            if ids.contains(&snippet.id) {
                snippet.deleted_at = if restore { None } else { Some(now) };
            }
        }
        self.publish();

        self.write_index(&folder).await?;
        self.sync_snippets_to_vscode().await?;
        Ok(())
    }

    /// Drops the record first, then the body. If the body cannot be removed
    /// the index still no longer references it.
    pub async fn delete_snippet_forever(&mut self, id: &str) -> StoreResult<()> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(());
        };
        // Only ids with a record name a body file; anything else is left alone.
        if self.snippet(id).is_none() {
            debug!("delete of unknown snippet {} skipped", id);
            return Ok(());
        }

        self.state.snippets.retain(|s| s.id != id);
        self.publish();
        self.write_index(&folder).await?;

        self.tracker.record_save(id);
        if let Err(e) = delete_content(&folder, id).await {
            warn!("Snippet {} removed from index but its file remains: {:#}", id, e);
            return Err(e.into());
        }

        info!("deleted snippet {}", id);
        Ok(())
    }

    /// Removes every trashed snippet. Bodies are deleted concurrently and
    /// one failure does not stop the others. Returns how many were removed.
    pub async fn empty_trash(&mut self) -> StoreResult<usize> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(0);
        };

        let (trashed, kept): (Vec<Snippet>, Vec<Snippet>) = self
            .state
            .snippets
            .drain(..)
            .partition(Snippet::is_trashed);
        self.state.snippets = kept;
        self.publish();
        self.write_index(&folder).await?;

        let mut deletions = JoinSet::new();
        for snippet in trashed {
            self.tracker.record_save(&snippet.id);
            let folder = folder.clone();
            deletions.spawn(async move {
                let result = delete_content(&folder, &snippet.id).await;
                (snippet.id, result)
            });
        }

        let mut removed = 0;
        while let Some(joined) = deletions.join_next().await {
            match joined {
                Ok((_, Ok(()))) => removed += 1,
                Ok((id, Err(e))) => warn!("Failed to delete trashed snippet {}: {:#}", id, e),
                Err(e) => warn!("Trash deletion task failed: {}", e),
            }
        }

        info!("emptied trash, {} snippets removed", removed);
        Ok(removed)
    }

    /// `None` when no folder is open or export is disabled.
    pub async fn sync_snippets_to_vscode(&self) -> StoreResult<Option<SyncOutcome>> {
        let (Some(folder), Some(exporter)) = (self.folder(), self.exporter.as_ref()) else {
            return Ok(None);
        };

        let outcome = exporter.sync(folder, &self.state.snippets).await?;
        Ok(Some(outcome))
    }

    pub fn known_ids(&self) -> Vec<String> {
        self.state.snippets.iter().map(|s| s.id.clone()).collect()
    }

    /// Reacts to a change in the open folder. Index changes reload the
    /// folder here; content changes are handed back for the open editor.
    pub async fn handle_file_event(&mut self, event: &FileEvent) -> StoreResult<FileChangeAction> {
        let action = classify_event(event, &self.tracker, &self.known_ids());

        if action == FileChangeAction::ReloadIndex {
            info!("index changed on disk, reloading");
            self.reload_open_folder().await?;
        }

        self.tracker.cleanup();
        Ok(action)
    }

    /// Brings the open folder up to date after a watcher event or poll tick.
    /// A poll reload can replace newer in-memory state with what is on disk.
    pub async fn refresh(&mut self, trigger: &SyncTrigger) -> StoreResult<FileChangeAction> {
        match trigger {
            SyncTrigger::Event(event) => self.handle_file_event(event).await,
            SyncTrigger::Poll => {
                self.reload_open_folder().await?;
                Ok(FileChangeAction::ReloadIndex)
            }
        }
    }

    /// Re-reads the current folder. If it has vanished it is closed, so the
    /// removal is reported once rather than on every later refresh.
    async fn reload_open_folder(&mut self) -> StoreResult<()> {
        let Some(folder) = self.state.folder.clone() else {
            return Ok(());
        };
        if self.load_folder(&folder).await? == FolderLoad::Missing {
            warn!("open folder {:?} is gone, closing it", folder);
            self.state.folder = None;
            self.state.snippets.clear();
            self.publish();
        }
        Ok(())
    }
}
