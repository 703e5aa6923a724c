//! Storage facade over a folder/file/spreadsheet drive.
//!
//! All persistence in WealthPro goes through [`DriveClient`]. Two backends
//! are provided: [`GoogleDrive`] talks to Google Drive v3 and Sheets v4,
//! and [`SqliteDrive`] emulates the same hierarchy in a local SQLite file.

mod google;
pub mod range;
mod sqlite;
mod traits;
mod types;

pub use google::{GoogleDrive, GoogleDriveConfig};
pub use range::SheetRange;
pub use sqlite::{SqliteDrive, ROOT_ID};
pub use traits::DriveClient;
pub use types::{ChildQuery, DriveItem, ItemKind};
