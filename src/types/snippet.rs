use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SNIPPET_NAME: &str = "Untitled";
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// One entry of a folder's `snippets.json`.
///
/// The body is not part of the record; it lives in a file named by `id`
/// next to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vscode_snippet: Option<VscodeSnippet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VscodeSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl Snippet {
    pub fn new(id: String, fields: NewSnippet) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: fields.name,
            created_at: now,
            updated_at: now,
            language: fields.language,
            deleted_at: None,
            vscode_snippet: fields.export_prefix.map(|prefix| VscodeSnippet {
                prefix: Some(prefix),
            }),
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn export_prefix(&self) -> Option<&str> {
        self.vscode_snippet
            .as_ref()
            .and_then(|v| v.prefix.as_deref())
    }

    /// Prefix with surrounding whitespace removed, `None` when blank.
    pub fn trimmed_export_prefix(&self) -> Option<&str> {
        self.export_prefix()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Applies a single-field edit. Does not touch `updated_at` unless the
    /// field itself is `UpdatedAt`.
    pub fn apply(&mut self, field: SnippetField) {
        match field {
            SnippetField::Name(name) => self.name = name,
            SnippetField::Language(language) => self.language = language,
            SnippetField::DeletedAt(deleted_at) => self.deleted_at = deleted_at,
            SnippetField::ExportPrefix(prefix) => {
                self.vscode_snippet = Some(VscodeSnippet { prefix });
            }
            SnippetField::UpdatedAt(updated_at) => self.updated_at = updated_at,
        }
    }
}

/// Caller-supplied fields for a snippet that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub name: String,
    pub language: Option<String>,
    pub export_prefix: Option<String>,
}

impl Default for NewSnippet {
    fn default() -> Self {
        Self {
            name: DEFAULT_SNIPPET_NAME.to_string(),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            export_prefix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetField {
    Name(String),
    Language(Option<String>),
    DeletedAt(Option<DateTime<Utc>>),
    ExportPrefix(Option<String>),
    UpdatedAt(DateTime<Utc>),
}

impl SnippetField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetField::Name(_) => "name",
            SnippetField::Language(_) => "language",
            SnippetField::DeletedAt(_) => "deletedAt",
            SnippetField::ExportPrefix(_) => "vscodeSnippet",
            SnippetField::UpdatedAt(_) => "updatedAt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_index_written_by_older_versions() {
        let json = r#"{
            "id": "V1StGXR8_Z",
            "name": "debounce",
            "createdAt": "2023-05-01T10:00:00.000Z",
            "updatedAt": "2023-05-02T11:30:00.000Z",
            "language": "typescript",
            "vscodeSnippet": { "prefix": "deb, debounce" }
        }"#;
        let snippet: Snippet = serde_json::from_str(json).unwrap();
        assert_eq!(snippet.id, "V1StGXR8_Z");
        assert_eq!(snippet.language.as_deref(), Some("typescript"));
        assert_eq!(snippet.export_prefix(), Some("deb, debounce"));
        assert!(!snippet.is_trashed());
    }

    #[test]
    fn test_optional_keys_are_omitted() {
        let snippet = Snippet::new("abc".to_string(), NewSnippet {
            name: "x".to_string(),
            language: None,
            export_prefix: None,
        });
        let json = serde_json::to_value(&snippet).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.contains_key("language"));
        assert!(!obj.contains_key("deletedAt"));
        assert!(!obj.contains_key("vscodeSnippet"));
    }

    #[test]
    fn test_blank_prefix_is_none() {
        let mut snippet = Snippet::new("a".to_string(), NewSnippet::default());
        snippet.apply(SnippetField::ExportPrefix(Some("   ".to_string())));
        assert_eq!(snippet.trimmed_export_prefix(), None);

        snippet.apply(SnippetField::ExportPrefix(Some("  log ".to_string())));
        assert_eq!(snippet.trimmed_export_prefix(), Some("log"));
    }

    #[test]
    fn test_apply_leaves_updated_at_alone() {
        let mut snippet = Snippet::new("a".to_string(), NewSnippet::default());
        let before = snippet.updated_at;
        snippet.apply(SnippetField::Name("renamed".to_string()));
        assert_eq!(snippet.name, "renamed");
        assert_eq!(snippet.updated_at, before);
    }

    #[test]
    fn test_new_snippet_defaults() {
        let fields = NewSnippet::default();
        assert_eq!(fields.name, "Untitled");
        assert_eq!(fields.language.as_deref(), Some("plaintext"));
    }
}
