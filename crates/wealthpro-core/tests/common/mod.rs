#![allow(dead_code)]

use std::cell::Cell;

use wealthpro_core::drive::{ChildQuery, DriveClient, DriveItem, SqliteDrive, ROOT_ID};
use wealthpro_core::{CrmError, Result, WorkspaceLayout};

/// A local drive whose file writes and moves can be made to fail.
pub struct FlakyDrive {
    inner: SqliteDrive,
    pub fail_file_writes: Cell<bool>,
    pub fail_moves: Cell<bool>,
}

impl FlakyDrive {
    pub fn new() -> Self {
        Self {
            inner: SqliteDrive::open_in_memory().expect("in-memory drive"),
            fail_file_writes: Cell::new(false),
            fail_moves: Cell::new(false),
        }
    }

    fn injected(operation: &'static str) -> CrmError {
        CrmError::remote(operation, "injected failure")
    }
}

impl DriveClient for FlakyDrive {
    fn list_children(&self, parent_id: &str, query: &ChildQuery) -> Result<Vec<DriveItem>> {
        self.inner.list_children(parent_id, query)
    }

    fn get_item(&self, id: &str) -> Result<Option<DriveItem>> {
        self.inner.get_item(id)
    }

    fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem> {
        self.inner.create_folder(parent_id, name)
    }

    fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<DriveItem> {
        if self.fail_file_writes.get() {
            return Err(Self::injected("files.create"));
        }
        self.inner.create_file(parent_id, name, mime_type, content)
    }

    fn update_file(&self, file_id: &str, content: &[u8]) -> Result<()> {
        if self.fail_file_writes.get() {
            return Err(Self::injected("files.update"));
        }
        self.inner.update_file(file_id, content)
    }

    fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        self.inner.download_file(file_id)
    }

    fn move_item(&self, item_id: &str, from_parent: &str, to_parent: &str) -> Result<()> {
        if self.fail_moves.get() {
            return Err(Self::injected("files.move"));
        }
        self.inner.move_item(item_id, from_parent, to_parent)
    }

    fn trash_item(&self, item_id: &str) -> Result<()> {
        self.inner.trash_item(item_id)
    }

    fn create_spreadsheet(
        &self,
        parent_id: &str,
        title: &str,
        sheet_title: &str,
    ) -> Result<DriveItem> {
        self.inner.create_spreadsheet(parent_id, title, sheet_title)
    }

    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        self.inner.read_range(spreadsheet_id, range)
    }

    fn update_range(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        self.inner.update_range(spreadsheet_id, range, rows)
    }

    fn append_rows(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        self.inner.append_rows(spreadsheet_id, range, rows)
    }
}

pub fn bootstrap<D: DriveClient>(drive: &D) -> WorkspaceLayout {
    WorkspaceLayout::bootstrap(drive, ROOT_ID).expect("bootstrap should succeed")
}

pub fn child_names<D: DriveClient>(drive: &D, parent_id: &str, query: &ChildQuery) -> Vec<String> {
    drive
        .list_children(parent_id, query)
        .expect("list should succeed")
        .into_iter()
        .map(|item| item.name)
        .collect()
}

pub fn today_string() -> String {
    wealthpro_core::format_date(wealthpro_core::today())
}
