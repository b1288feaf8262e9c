use serde::{Deserialize, Serialize};

/// Newest entry plus this many older ones are kept in the folder history.
pub const FOLDER_HISTORY_RETAINED: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub folders: Vec<String>,
}

impl AppData {
    /// Records `folder` as the most recently opened one.
    pub fn touch_folder(&mut self, folder: &str) {
        if self.folders.iter().any(|f| f == folder) {
            self.folders.retain(|f| f != folder);
            self.folders.insert(0, folder.to_string());
        } else {
            self.folders.truncate(FOLDER_HISTORY_RETAINED);
            self.folders.insert(0, folder.to_string());
        }
    }

    pub fn remove_folder(&mut self, folder: &str) {
        self.folders.retain(|f| f != folder);
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.folders.first().map(String::as_str)
    }
}
