//! Item row type for database queries.

use chrono::{DateTime, Utc};

use crate::drive::types::{DriveItem, ItemKind};
use crate::error::{CrmError, Result};

/// Column list matching [`ItemRow::from_row`].
pub const ITEM_COLUMNS: &str = "id, name, kind, mime_type, parent_id, created_at, trashed";

/// Raw row data from the items table, before parsing into domain types.
#[derive(Debug)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub mime_type: String,
    pub parent_id: Option<String>,
    pub created_at: String,
    pub trashed: bool,
}

impl ItemRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: row.get(2)?,
            mime_type: row.get(3)?,
            parent_id: row.get(4)?,
            created_at: row.get(5)?,
            trashed: row.get::<_, i64>(6)? != 0,
        })
    }
}

impl TryFrom<ItemRow> for DriveItem {
    type Error = CrmError;

    fn try_from(row: ItemRow) -> Result<Self> {
        let kind = ItemKind::parse(&row.kind)
            .ok_or_else(|| CrmError::Storage(format!("Invalid item kind: {}", row.kind)))?;
        let created_time = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| CrmError::Storage(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(DriveItem {
            id: row.id,
            name: row.name,
            kind,
            mime_type: row.mime_type,
            parents: row.parent_id.into_iter().collect(),
            created_time: Some(created_time),
            trashed: row.trashed,
        })
    }
}
