//! Root folder tree bootstrap.
//!
//! Every invocation resolves the fixed top-level layout under the configured
//! root folder: the Active/Archived client roots and the tasks spreadsheet.
//! Missing pieces are created, so a brand new root becomes usable on first
//! contact.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drive::{ChildQuery, DriveClient, ItemKind};
use crate::error::{CrmError, Result};
use crate::folders::ensure_folder;
use crate::layout::{ACTIVE_CLIENTS, ARCHIVED_CLIENTS, TASKS_SHEET, TASKS_SPREADSHEET};

/// Resolved IDs of the top-level layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    pub root_id: String,
    pub active_id: String,
    pub archived_id: String,
    pub tasks_sheet_id: String,
}

impl WorkspaceLayout {
    /// Find or create the top-level layout under `root_id`.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::Config` if `root_id` is blank, or the drive error
    /// if any lookup or creation fails.
    pub fn bootstrap<D: DriveClient + ?Sized>(drive: &D, root_id: &str) -> Result<Self> {
        if root_id.trim().is_empty() {
            return Err(CrmError::Config("Root folder ID is not set".to_string()));
        }

        let active_id = ensure_folder(drive, root_id, ACTIVE_CLIENTS)?;
        let archived_id = ensure_folder(drive, root_id, ARCHIVED_CLIENTS)?;

        let existing = drive.list_children(
            root_id,
            &ChildQuery::new()
                .named(TASKS_SPREADSHEET)
                .kind(ItemKind::Spreadsheet),
        )?;
        let tasks_sheet_id = match existing.into_iter().next() {
            Some(sheet) => sheet.id,
            None => {
                info!(root_id, "creating tasks spreadsheet");
                drive
                    .create_spreadsheet(root_id, TASKS_SPREADSHEET, TASKS_SHEET)?
                    .id
            }
        };

        Ok(Self {
            root_id: root_id.to_string(),
            active_id,
            archived_id,
            tasks_sheet_id,
        })
    }
}
