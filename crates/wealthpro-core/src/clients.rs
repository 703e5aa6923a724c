//! Client directory.
//!
//! A client exists only as a folder: `Active Clients/<display name>` or
//! `Archived Clients/<display name>`. There is no separate client row.
//! Archiving moves the folder between the two roots; deleting sets the
//! folder's trashed flag.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::drive::{ChildQuery, DriveClient, DriveItem};
use crate::error::{CrmError, Result};
use crate::folders::{ensure_folder, ensure_folders, find_folder};
use crate::layout::{CLIENT_SUBFOLDERS, TASKS, TASK_SUBFOLDERS};
use crate::names::{canonical_display_name, split_name};
use crate::workspace::WorkspaceLayout;

/// Which root currently holds a client folder.
///
/// Ordering is `Active < Archived`, which is also the list sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Archived,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client, shaped for presentation: every string field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Folder ID
    pub id: String,

    /// Folder name, conventionally `"Surname, Firstname"`
    pub display_name: String,

    pub first_name: String,
    pub last_name: String,

    /// Only known at creation time; empty when read back
    pub email: String,

    /// Only known at creation time; empty when read back
    pub phone: String,

    /// Folder creation date (`YYYY-MM-DD`)
    pub created_at: String,

    pub status: ClientStatus,

    /// Category folder name -> folder ID
    pub subfolders: BTreeMap<String, String>,
}

impl ClientRecord {
    fn from_item(
        item: &DriveItem,
        status: ClientStatus,
        subfolders: BTreeMap<String, String>,
    ) -> Self {
        let (first_name, last_name) = split_name(&item.name);
        Self {
            id: item.id.clone(),
            display_name: item.name.clone(),
            first_name,
            last_name,
            email: String::new(),
            phone: String::new(),
            created_at: item.created_date(),
            status,
            subfolders,
        }
    }
}

/// Builder for creating new clients.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl NewClient {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }
}

/// Client folder operations over a bootstrapped workspace.
pub struct ClientDirectory<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
    layout: &'a WorkspaceLayout,
}

impl<'a, D: DriveClient + ?Sized> ClientDirectory<'a, D> {
    pub fn new(drive: &'a D, layout: &'a WorkspaceLayout) -> Self {
        Self { drive, layout }
    }

    /// Find-or-create the folder `name` under `parent_id`.
    pub fn ensure_container(&self, parent_id: &str, name: &str) -> Result<String> {
        ensure_folder(self.drive, parent_id, name)
    }

    /// Create a client folder tree under `Active Clients`.
    ///
    /// The folder is named `"Last, First"` when both names are given,
    /// otherwise the supplied display name. Re-creating an existing client
    /// reuses its folders.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::InvalidInput` if no usable name is supplied.
    pub fn create_client(&self, client: &NewClient) -> Result<ClientRecord> {
        let display_name =
            canonical_display_name(&client.first_name, &client.last_name, &client.display_name);
        if display_name.is_empty() {
            return Err(CrmError::InvalidInput(
                "Client needs a display name or both first and last names".to_string(),
            ));
        }

        let client_id = self.ensure_container(&self.layout.active_id, &display_name)?;
        let subfolders = ensure_folders(self.drive, &client_id, &CLIENT_SUBFOLDERS)?;
        if let Some(tasks_id) = subfolders.get(TASKS) {
            ensure_folders(self.drive, tasks_id, &TASK_SUBFOLDERS)?;
        }

        // Partial names fall back to the folder name, as reads do.
        let (first_name, last_name) =
            if client.first_name.trim().is_empty() || client.last_name.trim().is_empty() {
                split_name(&display_name)
            } else {
                (
                    client.first_name.trim().to_string(),
                    client.last_name.trim().to_string(),
                )
            };
        let created_at = self
            .drive
            .get_item(&client_id)?
            .map(|item| item.created_date())
            .filter(|date| !date.is_empty())
            .unwrap_or_else(|| crate::format_date(crate::today()));

        info!(client_id = %client_id, display_name = %display_name, "created client");

        Ok(ClientRecord {
            id: client_id,
            display_name,
            first_name,
            last_name,
            email: client.email.trim().to_string(),
            phone: client.phone.trim().to_string(),
            created_at,
            status: ClientStatus::Active,
            subfolders,
        })
    }

    /// Move the active client folder named `display_name` to `Archived Clients`.
    ///
    /// Returns `false` (and changes nothing) when no such active client exists.
    pub fn archive(&self, display_name: &str) -> Result<bool> {
        self.move_between(
            display_name,
            &self.layout.active_id,
            &self.layout.archived_id,
        )
    }

    /// Move an archived client folder back to `Active Clients`.
    ///
    /// Returns `false` when no such archived client exists.
    pub fn restore(&self, display_name: &str) -> Result<bool> {
        self.move_between(
            display_name,
            &self.layout.archived_id,
            &self.layout.active_id,
        )
    }

    fn move_between(&self, display_name: &str, from: &str, to: &str) -> Result<bool> {
        let Some(folder) = find_folder(self.drive, from, display_name)? else {
            debug!(display_name, "client folder not found, nothing to move");
            return Ok(false);
        };
        self.drive.move_item(&folder.id, from, to)?;
        info!(client_id = %folder.id, display_name, "moved client folder");
        Ok(true)
    }

    /// List every client under both roots.
    ///
    /// Sorted by status (Active first), then case-insensitive display name.
    /// `subfolders` is left empty here; use [`ClientDirectory::get`] for it.
    pub fn list_all(&self) -> Result<Vec<ClientRecord>> {
        let mut clients = Vec::new();
        for (root, status) in [
            (&self.layout.active_id, ClientStatus::Active),
            (&self.layout.archived_id, ClientStatus::Archived),
        ] {
            for item in self.drive.list_children(root, &ChildQuery::folders())? {
                clients.push(ClientRecord::from_item(&item, status, BTreeMap::new()));
            }
        }

        clients.sort_by(|a, b| {
            a.status.cmp(&b.status).then_with(|| {
                a.display_name
                    .to_lowercase()
                    .cmp(&b.display_name.to_lowercase())
            })
        });
        Ok(clients)
    }

    /// Look up a client by folder ID.
    ///
    /// Returns `Ok(None)` if the ID is unknown, trashed, or not a client folder.
    pub fn get(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        let Some(item) = self.drive.get_item(client_id)? else {
            return Ok(None);
        };
        if item.trashed || !item.is_folder() {
            return Ok(None);
        }
        let status = if item.has_parent(&self.layout.active_id) {
            ClientStatus::Active
        } else if item.has_parent(&self.layout.archived_id) {
            ClientStatus::Archived
        } else {
            return Ok(None);
        };

        let mut subfolders = BTreeMap::new();
        for child in self.drive.list_children(&item.id, &ChildQuery::folders())? {
            subfolders.entry(child.name).or_insert(child.id);
        }
        Ok(Some(ClientRecord::from_item(&item, status, subfolders)))
    }

    /// Look up a client by exact display name, active clients first.
    pub fn find_by_name(&self, display_name: &str) -> Result<Option<ClientRecord>> {
        for root in [&self.layout.active_id, &self.layout.archived_id] {
            if let Some(folder) = find_folder(self.drive, root, display_name)? {
                return self.get(&folder.id);
            }
        }
        Ok(None)
    }

    /// Resolve a client from either a folder ID or an exact display name.
    pub fn resolve(&self, reference: &str) -> Result<Option<ClientRecord>> {
        if let Some(client) = self.get(reference)? {
            return Ok(Some(client));
        }
        self.find_by_name(reference)
    }

    /// Find-or-create a category folder inside a client folder.
    pub fn subfolder(&self, client_id: &str, name: &str) -> Result<String> {
        self.ensure_container(client_id, name)
    }

    /// Trash a client folder.
    ///
    /// Failures are logged and reported as `false` rather than returned.
    pub fn delete(&self, container_id: &str) -> bool {
        match self.drive.trash_item(container_id) {
            Ok(()) => {
                info!(client_id = container_id, "trashed client folder");
                true
            }
            Err(err) => {
                warn!(client_id = container_id, error = %err, "failed to trash client folder");
                false
            }
        }
    }
}
