//! Drive client trait definition.
//!
//! The `DriveClient` trait is the only way the domain modules touch
//! persisted data. It mirrors the small subset of a cloud drive that
//! WealthPro needs: folders, opaque files, and spreadsheet ranges.

use super::types::{ChildQuery, DriveItem};
use crate::error::Result;

/// Storage facade for folders, files and spreadsheet tables.
///
/// Implementations must ensure:
/// - Identifiers are opaque strings chosen by the backend
/// - Listing returns every non-trashed direct child (paging is internal)
/// - Spreadsheet ranges use A1 notation (`Sheet!A2:K`), row-major, 1-indexed
///
/// There are no transactions: every call is an independent round trip and
/// a failure part-way through a multi-call operation leaves earlier calls
/// applied.
pub trait DriveClient {
    /// List the non-trashed direct children of `parent_id` that match `query`.
    fn list_children(&self, parent_id: &str, query: &ChildQuery) -> Result<Vec<DriveItem>>;

    /// Get an item by ID.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(item))` if found, `Ok(None)` if not found.
    fn get_item(&self, id: &str) -> Result<Option<DriveItem>>;

    /// Create a folder under `parent_id`.
    fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem>;

    /// Create a file with the given content under `parent_id`.
    ///
    /// Names are not unique: creating a second file with the same name
    /// produces a second item.
    fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<DriveItem>;

    /// Replace the content of an existing file.
    fn update_file(&self, file_id: &str, content: &[u8]) -> Result<()>;

    /// Download the full content of a file.
    fn download_file(&self, file_id: &str) -> Result<Vec<u8>>;

    /// Reparent an item from `from_parent` to `to_parent`.
    fn move_item(&self, item_id: &str, from_parent: &str, to_parent: &str) -> Result<()>;

    /// Set the trashed flag on an item. Trashed items no longer list.
    fn trash_item(&self, item_id: &str) -> Result<()>;

    /// Create a spreadsheet under `parent_id` whose first sheet is `sheet_title`.
    fn create_spreadsheet(
        &self,
        parent_id: &str,
        title: &str,
        sheet_title: &str,
    ) -> Result<DriveItem>;

    /// Read a rectangular range.
    ///
    /// Trailing empty cells in a row and trailing empty rows are omitted,
    /// so callers must tolerate short rows.
    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;

    /// Overwrite cells starting at the top-left corner of `range`.
    fn update_range(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()>;

    /// Append rows after the last non-empty row of the sheet named in `range`.
    fn append_rows(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn(_drive: &dyn DriveClient) {}
    }
}
