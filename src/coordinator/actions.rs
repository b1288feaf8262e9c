//! Destructive snippet actions, each gated behind a confirmation.
//! Declining is not an error; the action simply does not run.

use tracing::{info, warn};

use crate::coordinator::prompt::Confirm;
use crate::coordinator::store::SnippetStore;
use crate::error::StoreResult;

pub const CONFIRM_RESTORE: &str = "Are you sure you want to restore this snippet from Trash?";
pub const CONFIRM_TRASH: &str = "Are you sure you want to move it to Trash?";
pub const CONFIRM_RESTORE_SELECTED: &str =
    "Are you sure you want to restore selected snippets from Trash";
pub const CONFIRM_TRASH_SELECTED: &str = "Are you sure you want to move selected snippets to Trash?";
pub const CONFIRM_DELETE_FOREVER: &str = "Are you sure you want to delete this snippet forever?";
pub const CONFIRM_EMPTY_TRASH: &str =
    "Are you sure you want to permanently erase the items in the Trash?";

/// Trashes an active snippet or restores a trashed one.
pub async fn trash_or_restore(
    store: &mut SnippetStore,
    confirm: &dyn Confirm,
    id: &str,
) -> StoreResult<bool> {
    let Some(snippet) = store.snippet(id) else {
        warn!("snippet not found: {}", id);
        return Ok(false);
    };
    let name = snippet.name.clone();

    if snippet.is_trashed() {
        if !confirm.confirm(CONFIRM_RESTORE) {
            return Ok(false);
        }
        info!("restoring {}:{} from trash", id, name);
        store.move_snippets_to_trash(&[id.to_string()], true).await?;
    } else {
        if !confirm.confirm(CONFIRM_TRASH) {
            return Ok(false);
        }
        info!("moving {}:{} to trash", id, name);
        store.move_snippets_to_trash(&[id.to_string()], false).await?;
    }

    Ok(true)
}

/// One confirmation for the whole batch.
pub async fn trash_or_restore_selected(
    store: &mut SnippetStore,
    confirm: &dyn Confirm,
    ids: &[String],
    restore: bool,
) -> StoreResult<bool> {
    if ids.is_empty() {
        return Ok(false);
    }
    let message = if restore {
        CONFIRM_RESTORE_SELECTED
    } else {
        CONFIRM_TRASH_SELECTED
    };
    if !confirm.confirm(message) {
        return Ok(false);
    }

    store.move_snippets_to_trash(ids, restore).await?;
    Ok(true)
}

pub async fn delete_forever(
    store: &mut SnippetStore,
    confirm: &dyn Confirm,
    id: &str,
) -> StoreResult<bool> {
    if !confirm.confirm(CONFIRM_DELETE_FOREVER) {
        return Ok(false);
    }
    store.delete_snippet_forever(id).await?;
    Ok(true)
}

pub async fn empty_trash(store: &mut SnippetStore, confirm: &dyn Confirm) -> StoreResult<bool> {
    if !confirm.confirm(CONFIRM_EMPTY_TRASH) {
        return Ok(false);
    }
    store.empty_trash().await?;
    Ok(true)
}
