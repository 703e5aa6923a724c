//! Fixed names of the persisted drive layout.
//!
//! Existing drives depend on these exact strings; changing any of them
//! orphans data already written.

/// Folder under the root holding one folder per active client.
pub const ACTIVE_CLIENTS: &str = "Active Clients";

/// Folder under the root holding archived client folders.
pub const ARCHIVED_CLIENTS: &str = "Archived Clients";

/// Spreadsheet under the root holding the task ledger.
pub const TASKS_SPREADSHEET: &str = "WealthPro CRM - Tasks";

/// Sheet inside [`TASKS_SPREADSHEET`].
pub const TASKS_SHEET: &str = "Tasks";

/// Task ledger header row, in column order.
pub const TASK_HEADER: [&str; 11] = [
    "task_id",
    "client_id",
    "task_type",
    "title",
    "description",
    "due_date",
    "priority",
    "status",
    "created_date",
    "completed_date",
    "time_spent",
];

pub const COMMUNICATIONS: &str = "Communications";
pub const TASKS: &str = "Tasks";
pub const REVIEWS: &str = "Reviews";
pub const FACT_FIND: &str = "Fact Find";
pub const COMPLIANCE: &str = "Compliance";
pub const PORTFOLIO: &str = "Portfolio";
pub const DOCUMENTS: &str = "Documents";

/// Folders created inside every client folder.
pub const CLIENT_SUBFOLDERS: [&str; 7] = [
    COMMUNICATIONS,
    TASKS,
    REVIEWS,
    FACT_FIND,
    COMPLIANCE,
    PORTFOLIO,
    DOCUMENTS,
];

pub const ONGOING_TASKS: &str = "Ongoing Tasks";
pub const COMPLETED_TASKS: &str = "Completed Tasks";

/// Folders created inside `Tasks`.
pub const TASK_SUBFOLDERS: [&str; 2] = [ONGOING_TASKS, COMPLETED_TASKS];

pub const AGENDA_AND_VALUATION: &str = "Agenda & Valuation";

/// Folders created inside each `Reviews/Review <year>` folder.
pub const REVIEW_SUBFOLDERS: [&str; 8] = [
    AGENDA_AND_VALUATION,
    "FF&ATR",
    "ID&V & Sanction Search",
    "Meeting Notes",
    "Research",
    "Review Letter",
    "Client Confirmation",
    "Emails",
];

/// Portfolio profile document inside a client's `Portfolio` folder.
pub const PORTFOLIO_FILE: &str = "portfolio.json";

/// Remembered option lists document under the root.
pub const SETTINGS_FILE: &str = "settings.json";

/// Name of the review folder for a given year.
pub fn review_folder_name(year: i32) -> String {
    format!("Review {}", year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_eleven_columns() {
        assert_eq!(TASK_HEADER.len(), 11);
        assert_eq!(TASK_HEADER[0], "task_id");
        assert_eq!(TASK_HEADER[10], "time_spent");
    }

    #[test]
    fn test_review_folder_name() {
        assert_eq!(review_folder_name(2025), "Review 2025");
    }
}
