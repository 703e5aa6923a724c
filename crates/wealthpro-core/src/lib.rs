//! # WealthPro Core
//!
//! Core library for WealthPro CRM - client records, tasks, portfolios and
//! review packs for financial advisers, persisted in a cloud drive rather
//! than a database of its own.
//!
//! This crate provides the domain logic and the storage facade, independent
//! of the CLI interface.
//!
//! ## Architecture
//!
//! - **drive**: Storage facade trait and backends (Google Drive/Sheets, local SQLite)
//! - **workspace**: Root folder tree and tasks spreadsheet bootstrap
//! - **clients**: Client directory (one folder per client)
//! - **tasks**: Task ledger (one spreadsheet row per task) and stub-file mirror
//! - **portfolio**: Per-client investment and pension profile
//! - **review_pack**: Annual review folder tree and generated documents
//! - **communications**: Per-client communication log
//! - **settings**: Remembered option lists

pub mod clients;
pub mod communications;
pub mod drive;
pub mod error;
pub mod folders;
pub mod layout;
pub mod names;
pub mod portfolio;
pub mod review_pack;
pub mod settings;
pub mod tasks;
pub mod workspace;

pub use drive::DriveClient;
pub use error::{CrmError, Result};
pub use workspace::WorkspaceLayout;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Date format used for every persisted date string.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in UTC, used for created/completed dates and review years.
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Format a date the way it is persisted (`YYYY-MM-DD`).
pub fn format_date(date: chrono::NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_format_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date), "2025-01-05");
    }
}
