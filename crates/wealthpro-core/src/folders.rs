//! Find-or-create helpers shared by the domain modules.

use std::collections::BTreeMap;

use tracing::debug;

use crate::drive::{ChildQuery, DriveClient, DriveItem};
use crate::error::Result;

/// Find the first non-trashed child folder of `parent_id` named exactly `name`.
pub fn find_folder<D: DriveClient + ?Sized>(
    drive: &D,
    parent_id: &str,
    name: &str,
) -> Result<Option<DriveItem>> {
    let mut matches = drive.list_children(parent_id, &ChildQuery::folders().named(name))?;
    if matches.is_empty() {
        return Ok(None);
    }
    Ok(Some(matches.swap_remove(0)))
}

/// Return the ID of the child folder `name` under `parent_id`, creating it if absent.
///
/// Idempotent by name: repeated calls return the same folder once it exists.
pub fn ensure_folder<D: DriveClient + ?Sized>(
    drive: &D,
    parent_id: &str,
    name: &str,
) -> Result<String> {
    if let Some(existing) = find_folder(drive, parent_id, name)? {
        return Ok(existing.id);
    }
    debug!(parent_id, name, "folder missing, creating");
    Ok(drive.create_folder(parent_id, name)?.id)
}

/// Ensure every folder in `names` exists under `parent_id`.
///
/// Returns a map of folder name to folder ID.
pub fn ensure_folders<D: DriveClient + ?Sized>(
    drive: &D,
    parent_id: &str,
    names: &[&str],
) -> Result<BTreeMap<String, String>> {
    let mut ids = BTreeMap::new();
    for name in names {
        let id = ensure_folder(drive, parent_id, name)?;
        ids.insert(name.to_string(), id);
    }
    Ok(ids)
}

/// Find the first plain file named `name` under `parent_id`.
pub fn find_file<D: DriveClient + ?Sized>(
    drive: &D,
    parent_id: &str,
    name: &str,
) -> Result<Option<DriveItem>> {
    let mut matches = drive.list_children(parent_id, &ChildQuery::files().named(name))?;
    if matches.is_empty() {
        return Ok(None);
    }
    Ok(Some(matches.swap_remove(0)))
}

/// Overwrite the file `name` under `parent_id`, creating it if absent.
pub fn write_file<D: DriveClient + ?Sized>(
    drive: &D,
    parent_id: &str,
    name: &str,
    mime_type: &str,
    content: &[u8],
) -> Result<String> {
    match find_file(drive, parent_id, name)? {
        Some(existing) => {
            drive.update_file(&existing.id, content)?;
            Ok(existing.id)
        }
        None => Ok(drive.create_file(parent_id, name, mime_type, content)?.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{SqliteDrive, ROOT_ID};

    #[test]
    fn test_ensure_folder_is_idempotent() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let first = ensure_folder(&drive, ROOT_ID, "Active Clients").unwrap();
        let second = ensure_folder(&drive, ROOT_ID, "Active Clients").unwrap();
        assert_eq!(first, second);
        let children = drive.list_children(ROOT_ID, &ChildQuery::new()).unwrap();
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn test_ensure_folder_ignores_files_with_same_name() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let file = drive
            .create_file(ROOT_ID, "Tasks", "text/plain", b"")
            .unwrap();
        let folder = ensure_folder(&drive, ROOT_ID, "Tasks").unwrap();
        assert_ne!(file.id, folder);
    }

    #[test]
    fn test_ensure_folders_returns_map() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let ids = ensure_folders(&drive, ROOT_ID, &["A", "B"]).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains_key("A"));
    }

    #[test]
    fn test_write_file_overwrites_in_place() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let first = write_file(&drive, ROOT_ID, "a.json", "application/json", b"1").unwrap();
        let second = write_file(&drive, ROOT_ID, "a.json", "application/json", b"2").unwrap();
        assert_eq!(first, second);
        assert_eq!(drive.download_file(&first).unwrap(), b"2");
    }
}
