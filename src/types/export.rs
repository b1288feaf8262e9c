use serde::{Deserialize, Serialize};

/// One snippet as VS Code reads it from a `.code-snippets` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub scope: String,
    pub prefix: Vec<String>,
    pub body: Vec<String>,
    /// Name of the folder the entry was exported from.
    #[serde(rename = "__folderName")]
    pub folder_name: String,
}

impl ExportEntry {
    pub fn new(prefix: &str, content: String, folder_name: &str) -> Self {
        Self {
            scope: String::new(),
            prefix: split_prefix(prefix),
            body: vec![content],
            folder_name: folder_name.to_string(),
        }
    }
}

/// Splits a comma separated trigger list, dropping blank pieces.
pub fn split_prefix(prefix: &str) -> Vec<String> {
    prefix
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
