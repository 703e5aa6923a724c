//! Core data types for the drive facade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME type Google Drive uses for folders.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// MIME type Google Drive uses for native spreadsheets.
pub const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// What an item in the drive is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Folder,
    Spreadsheet,
    File,
}

impl ItemKind {
    /// Classify a MIME type.
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type {
            FOLDER_MIME => Self::Folder,
            SPREADSHEET_MIME => Self::Spreadsheet,
            _ => Self::File,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Spreadsheet => "spreadsheet",
            Self::File => "file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "folder" => Some(Self::Folder),
            "spreadsheet" => Some(Self::Spreadsheet),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// A folder, file or spreadsheet in the drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveItem {
    /// Opaque backend identifier
    pub id: String,

    /// Display name (not unique within a folder)
    pub name: String,

    pub kind: ItemKind,

    pub mime_type: String,

    /// Parent folder IDs
    pub parents: Vec<String>,

    /// When the item was created, if the backend reports it
    pub created_time: Option<DateTime<Utc>>,

    pub trashed: bool,
}

impl DriveItem {
    /// Creation date as `YYYY-MM-DD`, or an empty string when unknown.
    pub fn created_date(&self) -> String {
        self.created_time
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    pub fn has_parent(&self, parent_id: &str) -> bool {
        self.parents.iter().any(|p| p == parent_id)
    }
}

/// Filter for listing the children of a folder.
#[derive(Debug, Clone, Default)]
pub struct ChildQuery {
    /// Exact name match
    pub name: Option<String>,

    /// Restrict to one kind of item
    pub kind: Option<ItemKind>,
}

impl ChildQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for "folders only".
    pub fn folders() -> Self {
        Self::new().kind(ItemKind::Folder)
    }

    /// Shorthand for "plain files only".
    pub fn files() -> Self {
        Self::new().kind(ItemKind::File)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Check whether an item satisfies this filter.
    pub fn matches(&self, item: &DriveItem) -> bool {
        if let Some(name) = &self.name {
            if &item.name != name {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if item.kind != kind {
                return false;
            }
        }
        true
    }
}
