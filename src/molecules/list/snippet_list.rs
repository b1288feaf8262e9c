use std::cmp::Ordering;

use crate::types::Snippet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListView {
    #[default]
    Active,
    Trash,
}

impl ListView {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListView::Active => "Search",
            ListView::Trash => "Trash",
        }
    }

    pub fn shows(&self, snippet: &Snippet) -> bool {
        match self {
            ListView::Active => !snippet.is_trashed(),
            ListView::Trash => snippet.is_trashed(),
        }
    }
}

/// Trashed pairs sort by newest `deletedAt`, everything else by newest
/// `createdAt`.
pub fn compare_snippets(a: &Snippet, b: &Snippet) -> Ordering {
    if let (Some(a_deleted), Some(b_deleted)) = (a.deleted_at, b.deleted_at) {
        return b_deleted.cmp(&a_deleted);
    }
    b.created_at.cmp(&a.created_at)
}

/// Sidebar state: which half of the folder is shown, the name filter and
/// the multi-selection.
#[derive(Debug, Clone, Default)]
pub struct SnippetList {
    view: ListView,
    search_query: String,
    selected_ids: Vec<String>,
}

impl SnippetList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ListView {
        self.view
    }

    /// Switching views clears the keyword and the selection.
    pub fn set_view(&mut self, view: ListView) {
        if self.view != view {
            self.view = view;
            self.search_query.clear();
            self.selected_ids.clear();
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    pub fn visible<'a>(&self, snippets: &'a [Snippet]) -> Vec<&'a Snippet> {
        let keyword = self.search_query.to_lowercase();
        let mut visible: Vec<&Snippet> = snippets
            .iter()
            .filter(|s| self.view.shows(s))
            .filter(|s| keyword.is_empty() || s.name.to_lowercase().contains(&keyword))
            .collect();
        visible.sort_by(|a, b| compare_snippets(a, b));
        visible
    }

    pub fn toggle_selected(&mut self, id: &str) {
        if let Some(pos) = self.selected_ids.iter().position(|s| s == id) {
            self.selected_ids.remove(pos);
        } else {
            self.selected_ids.push(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// The explicit selection plus the open snippet, when it is visible.
    pub fn actual_selection(&self, snippets: &[Snippet], current: Option<&str>) -> Vec<String> {
        let mut ids = self.selected_ids.clone();
        if let Some(current) = current
            && !ids.iter().any(|id| id == current)
            && self.visible(snippets).iter().any(|s| s.id == current)
        {
            ids.push(current.to_string());
        }
        ids
    }
}
