//! Local SQLite drive backend.
//!
//! Emulates the drive hierarchy (folders, files, spreadsheets with sheets
//! of string cells) in a single SQLite database. Used for offline work and
//! as the backend for every test. Spreadsheet rows are stored sparsely as
//! JSON arrays of cell strings keyed by row number.

mod row;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::drive::range::SheetRange;
use crate::drive::traits::DriveClient;
use crate::drive::types::{ChildQuery, DriveItem, ItemKind, FOLDER_MIME, SPREADSHEET_MIME};
use crate::error::{CrmError, Result};

use row::{ItemRow, ITEM_COLUMNS};

/// ID of the root folder every local drive starts with.
pub const ROOT_ID: &str = "root";

const ROOT_NAME: &str = "WealthPro CRM";

/// SQLite-backed drive.
pub struct SqliteDrive {
    conn: Mutex<Connection>,
}

impl SqliteDrive {
    /// Open (or create) a local drive file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a throwaway drive held entirely in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                mime_type TEXT NOT NULL,
                parent_id TEXT,
                created_at TEXT NOT NULL,
                trashed INTEGER NOT NULL DEFAULT 0,
                content BLOB
            );

            CREATE INDEX IF NOT EXISTS items_parent ON items (parent_id, name);

            CREATE TABLE IF NOT EXISTS sheets (
                spreadsheet_id TEXT NOT NULL,
                title TEXT NOT NULL,

                PRIMARY KEY (spreadsheet_id, title),
                FOREIGN KEY (spreadsheet_id) REFERENCES items(id)
            );

            -- Sparse rows: one JSON array of cell strings per non-empty row
            CREATE TABLE IF NOT EXISTS sheet_rows (
                spreadsheet_id TEXT NOT NULL,
                sheet TEXT NOT NULL,
                row_num INTEGER NOT NULL,
                cells_json TEXT NOT NULL,

                PRIMARY KEY (spreadsheet_id, sheet, row_num),
                FOREIGN KEY (spreadsheet_id, sheet) REFERENCES sheets(spreadsheet_id, title)
            );
            "#,
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO items (id, name, kind, mime_type, parent_id, created_at, trashed)
             VALUES (?1, ?2, 'folder', ?3, NULL, ?4, 0)",
            params![ROOT_ID, ROOT_NAME, FOLDER_MIME, chrono::Utc::now().to_rfc3339()],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CrmError::Storage("SQLite connection poisoned".to_string()))
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn fetch_item(conn: &Connection, id: &str) -> Result<Option<DriveItem>> {
        let sql = format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS);
        let row = conn
            .query_row(&sql, [id], ItemRow::from_row)
            .optional()?;
        row.map(DriveItem::try_from).transpose()
    }

    fn require_folder(conn: &Connection, id: &str) -> Result<()> {
        match Self::fetch_item(conn, id)? {
            Some(item) if item.is_folder() && !item.trashed => Ok(()),
            Some(_) => Err(CrmError::Validation(format!("{} is not a folder", id))),
            None => Err(CrmError::NotFound(format!("Folder {}", id))),
        }
    }

    fn insert_item(
        conn: &Connection,
        parent_id: &str,
        name: &str,
        kind: ItemKind,
        mime_type: &str,
        content: Option<&[u8]>,
    ) -> Result<DriveItem> {
        Self::require_folder(conn, parent_id)?;
        let id = Self::new_id();
        conn.execute(
            "INSERT INTO items (id, name, kind, mime_type, parent_id, created_at, trashed, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            params![
                id,
                name,
                kind.as_str(),
                mime_type,
                parent_id,
                chrono::Utc::now().to_rfc3339(),
                content
            ],
        )?;
        Self::fetch_item(conn, &id)?
            .ok_or_else(|| CrmError::Storage(format!("Item {} vanished after insert", id)))
    }

    fn require_sheet(conn: &Connection, spreadsheet_id: &str, sheet: &str) -> Result<()> {
        let exists: Option<String> = conn
            .query_row(
                "SELECT title FROM sheets WHERE spreadsheet_id = ?1 AND title = ?2",
                params![spreadsheet_id, sheet],
                |row| row.get(0),
            )
            .optional()?;
        match exists {
            Some(_) => Ok(()),
            None => Err(CrmError::NotFound(format!(
                "Sheet {} in spreadsheet {}",
                sheet, spreadsheet_id
            ))),
        }
    }

    fn load_rows(
        conn: &Connection,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> Result<BTreeMap<usize, Vec<String>>> {
        let mut stmt = conn.prepare(
            "SELECT row_num, cells_json FROM sheet_rows
             WHERE spreadsheet_id = ?1 AND sheet = ?2
             ORDER BY row_num",
        )?;
        let raw = stmt
            .query_map(params![spreadsheet_id, sheet], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut rows = BTreeMap::new();
        for (row_num, cells_json) in raw {
            let cells: Vec<String> = serde_json::from_str(&cells_json)
                .map_err(|e| CrmError::Storage(format!("Invalid row JSON: {}", e)))?;
            rows.insert(row_num as usize, cells);
        }
        Ok(rows)
    }

    fn store_row(
        conn: &Connection,
        spreadsheet_id: &str,
        sheet: &str,
        row_num: usize,
        cells: &[String],
    ) -> Result<()> {
        let cells_json = serde_json::to_string(cells)?;
        conn.execute(
            "INSERT OR REPLACE INTO sheet_rows (spreadsheet_id, sheet, row_num, cells_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![spreadsheet_id, sheet, row_num as i64, cells_json],
        )?;
        Ok(())
    }

    fn write_rows(
        conn: &Connection,
        spreadsheet_id: &str,
        sheet: &str,
        existing: &BTreeMap<usize, Vec<String>>,
        first_row: usize,
        start_col: usize,
        rows: &[Vec<String>],
    ) -> Result<()> {
        for (offset, values) in rows.iter().enumerate() {
            let row_num = first_row + offset;
            let mut cells = existing.get(&row_num).cloned().unwrap_or_default();
            if cells.len() < start_col + values.len() {
                cells.resize(start_col + values.len(), String::new());
            }
            for (i, value) in values.iter().enumerate() {
                cells[start_col + i] = value.clone();
            }
            Self::store_row(conn, spreadsheet_id, sheet, row_num, &cells)?;
        }
        Ok(())
    }

    fn check_width(range: &SheetRange, rows: &[Vec<String>]) -> Result<()> {
        if let Some(row) = rows.iter().find(|row| row.len() > range.width()) {
            return Err(CrmError::InvalidInput(format!(
                "Row of {} values does not fit range {}",
                row.len(),
                range.to_a1()
            )));
        }
        Ok(())
    }
}

/// Slice `cells[start..=end]` and drop trailing empty cells.
fn slice_cells(cells: &[String], start: usize, end: usize) -> Vec<String> {
    if start >= cells.len() {
        return Vec::new();
    }
    let end = end.min(cells.len() - 1);
    let mut out: Vec<String> = cells[start..=end].to_vec();
    while out.last().is_some_and(|c| c.is_empty()) {
        out.pop();
    }
    out
}

impl DriveClient for SqliteDrive {
    fn list_children(&self, parent_id: &str, query: &ChildQuery) -> Result<Vec<DriveItem>> {
        let conn = self.lock_conn()?;
        let sql = format!(
            "SELECT {} FROM items
             WHERE parent_id = ?1 AND trashed = 0
               AND (?2 IS NULL OR name = ?2)
               AND (?3 IS NULL OR kind = ?3)
             ORDER BY rowid",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![parent_id, query.name, query.kind.map(|k| k.as_str())],
                ItemRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(DriveItem::try_from).collect()
    }

    fn get_item(&self, id: &str) -> Result<Option<DriveItem>> {
        let conn = self.lock_conn()?;
        Self::fetch_item(&conn, id)
    }

    fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem> {
        let conn = self.lock_conn()?;
        Self::insert_item(&conn, parent_id, name, ItemKind::Folder, FOLDER_MIME, None)
    }

    fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<DriveItem> {
        let conn = self.lock_conn()?;
        Self::insert_item(
            &conn,
            parent_id,
            name,
            ItemKind::File,
            mime_type,
            Some(content),
        )
    }

    fn update_file(&self, file_id: &str, content: &[u8]) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            "UPDATE items SET content = ?1 WHERE id = ?2 AND kind = 'file'",
            params![content, file_id],
        )?;
        if changed == 0 {
            return Err(CrmError::NotFound(format!("File {}", file_id)));
        }
        Ok(())
    }

    fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let conn = self.lock_conn()?;
        let content: Option<Option<Vec<u8>>> = conn
            .query_row(
                "SELECT content FROM items WHERE id = ?1 AND kind = 'file'",
                [file_id],
                |row| row.get(0),
            )
            .optional()?;
        match content {
            Some(bytes) => Ok(bytes.unwrap_or_default()),
            None => Err(CrmError::NotFound(format!("File {}", file_id))),
        }
    }

    fn move_item(&self, item_id: &str, from_parent: &str, to_parent: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        Self::require_folder(&conn, to_parent)?;
        let changed = conn.execute(
            "UPDATE items SET parent_id = ?1 WHERE id = ?2 AND parent_id = ?3",
            params![to_parent, item_id, from_parent],
        )?;
        if changed == 0 {
            return Err(CrmError::NotFound(format!(
                "Item {} under {}",
                item_id, from_parent
            )));
        }
        Ok(())
    }

    fn trash_item(&self, item_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            "UPDATE items SET trashed = 1 WHERE id = ?1 AND id != ?2",
            params![item_id, ROOT_ID],
        )?;
        if changed == 0 {
            return Err(CrmError::NotFound(format!("Item {}", item_id)));
        }
        Ok(())
    }

    fn create_spreadsheet(
        &self,
        parent_id: &str,
        title: &str,
        sheet_title: &str,
    ) -> Result<DriveItem> {
        let conn = self.lock_conn()?;
        let item = Self::insert_item(
            &conn,
            parent_id,
            title,
            ItemKind::Spreadsheet,
            SPREADSHEET_MIME,
            None,
        )?;
        conn.execute(
            "INSERT INTO sheets (spreadsheet_id, title) VALUES (?1, ?2)",
            params![item.id, sheet_title],
        )?;
        Ok(item)
    }

    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let range = SheetRange::parse(range)?;
        let conn = self.lock_conn()?;
        Self::require_sheet(&conn, spreadsheet_id, &range.sheet)?;
        let rows = Self::load_rows(&conn, spreadsheet_id, &range.sheet)?;

        let last = rows.keys().next_back().copied().unwrap_or(0);
        let end = range.end_row.map(|e| e.min(last)).unwrap_or(last);

        let mut out = Vec::new();
        for row_num in range.start_row..=end {
            let cells = rows
                .get(&row_num)
                .map(|cells| slice_cells(cells, range.start_col, range.end_col))
                .unwrap_or_default();
            out.push(cells);
        }
        while out.last().is_some_and(|row| row.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    fn update_range(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let range = SheetRange::parse(range)?;
        Self::check_width(&range, rows)?;
        if let Some(end) = range.end_row {
            if rows.len() > end - range.start_row + 1 {
                return Err(CrmError::InvalidInput(format!(
                    "{} rows do not fit range {}",
                    rows.len(),
                    range.to_a1()
                )));
            }
        }

        let mut conn = self.lock_conn()?;
        Self::require_sheet(&conn, spreadsheet_id, &range.sheet)?;
        let tx = conn.transaction()?;
        let existing = Self::load_rows(&tx, spreadsheet_id, &range.sheet)?;
        Self::write_rows(
            &tx,
            spreadsheet_id,
            &range.sheet,
            &existing,
            range.start_row,
            range.start_col,
            rows,
        )?;
        tx.commit()?;
        Ok(())
    }

    fn append_rows(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let range = SheetRange::parse(range)?;
        Self::check_width(&range, rows)?;

        let mut conn = self.lock_conn()?;
        Self::require_sheet(&conn, spreadsheet_id, &range.sheet)?;
        let tx = conn.transaction()?;
        let existing = Self::load_rows(&tx, spreadsheet_id, &range.sheet)?;
        let last_used = existing
            .iter()
            .rev()
            .find(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
            .map(|(row_num, _)| *row_num)
            .unwrap_or(0);
        let first_row = (last_used + 1).max(range.start_row);
        Self::write_rows(
            &tx,
            spreadsheet_id,
            &range.sheet,
            &existing,
            first_row,
            range.start_col,
            rows,
        )?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_root_exists() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let root = drive.get_item(ROOT_ID).unwrap().unwrap();
        assert!(root.is_folder());
        assert_eq!(root.name, ROOT_NAME);
    }

    #[test]
    fn test_list_children_filters_by_name_and_kind() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        drive.create_folder(ROOT_ID, "Tasks").unwrap();
        drive
            .create_file(ROOT_ID, "Tasks", "text/plain", b"x")
            .unwrap();
        drive.create_folder(ROOT_ID, "Other").unwrap();

        let all = drive.list_children(ROOT_ID, &ChildQuery::new()).unwrap();
        assert_eq!(all.len(), 3);

        let folders = drive
            .list_children(ROOT_ID, &ChildQuery::folders().named("Tasks"))
            .unwrap();
        assert_eq!(folders.len(), 1);
        assert!(folders[0].is_folder());
    }

    #[test]
    fn test_create_under_missing_parent_fails() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let result = drive.create_folder("nope", "x");
        assert!(matches!(result, Err(CrmError::NotFound(_))));
    }

    #[test]
    fn test_trashed_items_do_not_list() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let folder = drive.create_folder(ROOT_ID, "Gone").unwrap();
        drive.trash_item(&folder.id).unwrap();
        let listed = drive.list_children(ROOT_ID, &ChildQuery::new()).unwrap();
        assert!(listed.is_empty());
        assert!(drive.get_item(&folder.id).unwrap().unwrap().trashed);
    }

    #[test]
    fn test_move_requires_current_parent() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let a = drive.create_folder(ROOT_ID, "A").unwrap();
        let b = drive.create_folder(ROOT_ID, "B").unwrap();
        let child = drive.create_folder(&a.id, "child").unwrap();

        assert!(drive.move_item(&child.id, &b.id, &a.id).is_err());
        drive.move_item(&child.id, &a.id, &b.id).unwrap();
        let moved = drive.get_item(&child.id).unwrap().unwrap();
        assert!(moved.has_parent(&b.id));
    }

    #[test]
    fn test_file_round_trip_and_update() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let file = drive
            .create_file(ROOT_ID, "a.txt", "text/plain", b"one")
            .unwrap();
        assert_eq!(drive.download_file(&file.id).unwrap(), b"one");
        drive.update_file(&file.id, b"two").unwrap();
        assert_eq!(drive.download_file(&file.id).unwrap(), b"two");
    }

    #[test]
    fn test_read_range_trims_trailing_cells_and_rows() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let sheet = drive.create_spreadsheet(ROOT_ID, "Book", "Tasks").unwrap();
        drive
            .update_range(
                &sheet.id,
                "Tasks!A1:C3",
                &[row(&["a", "b", ""]), row(&["", "", ""]), row(&["c"])],
            )
            .unwrap();

        let values = drive.read_range(&sheet.id, "Tasks!A1:C").unwrap();
        assert_eq!(values, vec![row(&["a", "b"]), row(&[]), row(&["c"])]);

        let tail = drive.read_range(&sheet.id, "Tasks!B1:C1").unwrap();
        assert_eq!(tail, vec![row(&["b"])]);
    }

    #[test]
    fn test_append_writes_after_last_used_row() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let sheet = drive.create_spreadsheet(ROOT_ID, "Book", "Tasks").unwrap();
        drive
            .update_range(&sheet.id, "Tasks!A1:B1", &[row(&["h1", "h2"])])
            .unwrap();
        drive
            .append_rows(&sheet.id, "Tasks!A:B", &[row(&["1", "x"])])
            .unwrap();
        drive
            .append_rows(&sheet.id, "Tasks!A:B", &[row(&["2", "y"])])
            .unwrap();

        let values = drive.read_range(&sheet.id, "Tasks!A2:B").unwrap();
        assert_eq!(values, vec![row(&["1", "x"]), row(&["2", "y"])]);
    }

    #[test]
    fn test_update_range_rejects_wide_rows() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let sheet = drive.create_spreadsheet(ROOT_ID, "Book", "Tasks").unwrap();
        let result = drive.update_range(&sheet.id, "Tasks!A1:B1", &[row(&["1", "2", "3"])]);
        assert!(matches!(result, Err(CrmError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_sheet_is_not_found() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let sheet = drive.create_spreadsheet(ROOT_ID, "Book", "Tasks").unwrap();
        let result = drive.read_range(&sheet.id, "Other!A1:B");
        assert!(matches!(result, Err(CrmError::NotFound(_))));
    }
}
