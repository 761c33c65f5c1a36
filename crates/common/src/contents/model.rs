use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of entry a namespace path resolves to.
///
/// Computed once per call from the backend's existence predicates and then
/// matched exhaustively; nothing downstream re-inspects the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Directory,
    Notebook,
    File,
}

impl EntryType {
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryType::Directory)
    }

    pub fn is_notebook(&self) -> bool {
        matches!(self, EntryType::Notebook)
    }
}

/// Body of a content model, shaped by the entry type.
///
/// Variant order matters: untagged deserialization tries top to bottom, and
/// `Json` matches any value, so it must stay last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// UTF-8 file body (plain files)
    Text(String),
    /// Directory listing
    Listing(Vec<ContentModel>),
    /// Decoded document body (notebooks)
    Json(serde_json::Value),
}

/// Generic record returned by read and list operations, and accepted as the
/// inbound payload of save.
///
/// `content` is `None` unless explicitly requested. `auxiliary_files` always
/// carries the full sidecar name set; values are `None` when sidecar content
/// was not requested (or is not valid UTF-8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentModel {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub content: Option<Content>,
    pub format: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub writable: bool,
    pub mimetype: Option<String>,
    #[serde(default)]
    pub auxiliary_files: BTreeMap<String, Option<String>>,
}

impl ContentModel {
    /// Bare model with the common base fields filled in.
    pub fn new(name: impl Into<String>, path: impl Into<String>, entry_type: EntryType) -> Self {
        let name = name.into();
        let mimetype = match entry_type {
            EntryType::File => mime_guess::from_path(&name)
                .first()
                .map(|m| m.to_string()),
            _ => None,
        };
        Self {
            name,
            path: path.into(),
            entry_type,
            content: None,
            format: None,
            created: None,
            last_modified: None,
            writable: true,
            mimetype,
            auxiliary_files: BTreeMap::new(),
        }
    }

    /// Directory entry with no content.
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, path, EntryType::Directory)
    }

    /// Notebook payload carrying a document body, ready to save.
    pub fn notebook(
        name: impl Into<String>,
        path: impl Into<String>,
        body: serde_json::Value,
    ) -> Self {
        let mut model = Self::new(name, path, EntryType::Notebook);
        model.content = Some(Content::Json(body));
        model.format = Some("json".to_string());
        model
    }

    /// The decoded document body, if this model carries one.
    pub fn json_content(&self) -> Option<&serde_json::Value> {
        match &self.content {
            Some(Content::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// The directory listing, if this model carries one.
    pub fn listing(&self) -> Option<&[ContentModel]> {
        match &self.content {
            Some(Content::Listing(entries)) => Some(entries),
            _ => None,
        }
    }
}

/// A timestamped snapshot of a document's primary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Sortable second-resolution timestamp string
    pub id: String,
    pub last_modified: DateTime<Utc>,
}
