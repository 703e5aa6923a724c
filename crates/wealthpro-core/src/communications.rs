//! Per-client communication log.
//!
//! Each entry is a text file in the client's `Communications` folder named
//! `"<date> - <kind> - <subject>.txt"`. The file name carries the metadata;
//! the body is the file content.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drive::{ChildQuery, DriveClient};
use crate::error::{CrmError, Result};
use crate::folders::{ensure_folder, find_folder};
use crate::layout::COMMUNICATIONS;

const EXTENSION: &str = ".txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunicationKind {
    Email,
    Phone,
    Meeting,
    Letter,
    Note,
}

impl CommunicationKind {
    pub const ALL: [CommunicationKind; 5] = [
        Self::Email,
        Self::Phone,
        Self::Meeting,
        Self::Letter,
        Self::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Meeting => "Meeting",
            Self::Letter => "Letter",
            Self::Note => "Note",
        }
    }
}

impl fmt::Display for CommunicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunicationKind {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CrmError::InvalidInput(format!(
                    "Unknown communication kind '{}' (expected email, phone, meeting, letter or note)",
                    s
                ))
            })
    }
}

/// A communication to record. `date` defaults to today.
#[derive(Debug, Clone)]
pub struct NewCommunication {
    pub kind: CommunicationKind,
    pub subject: String,
    pub body: String,
    pub date: Option<NaiveDate>,
}

/// A logged communication, recovered from its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunicationRecord {
    pub file_id: String,
    pub file_name: String,
    /// Empty when the file name does not follow the log convention
    pub date: String,
    pub kind: Option<CommunicationKind>,
    pub subject: String,
}

impl CommunicationRecord {
    /// Parse a log file name. Names that do not fit keep the whole name as subject.
    pub fn from_file(file_id: &str, file_name: &str) -> Self {
        let parsed = file_name
            .strip_suffix(EXTENSION)
            .and_then(|stem| {
                let mut parts = stem.splitn(3, " - ");
                Some((parts.next()?, parts.next()?, parts.next()?))
            })
            .and_then(|(date, kind, subject)| {
                NaiveDate::parse_from_str(date, crate::DATE_FORMAT).ok()?;
                let kind = kind.parse::<CommunicationKind>().ok()?;
                Some((date.to_string(), kind, subject.to_string()))
            });

        match parsed {
            Some((date, kind, subject)) => Self {
                file_id: file_id.to_string(),
                file_name: file_name.to_string(),
                date,
                kind: Some(kind),
                subject,
            },
            None => Self {
                file_id: file_id.to_string(),
                file_name: file_name.to_string(),
                date: String::new(),
                kind: None,
                subject: file_name.to_string(),
            },
        }
    }
}

/// Subjects end up in file names; strip path separators.
fn clean_subject(subject: &str) -> String {
    subject.trim().replace(['/', '\\'], "-")
}

pub struct CommunicationLog<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
}

impl<'a, D: DriveClient + ?Sized> CommunicationLog<'a, D> {
    pub fn new(drive: &'a D) -> Self {
        Self { drive }
    }

    /// Write a new log entry for `client_id`.
    pub fn record(&self, client_id: &str, entry: NewCommunication) -> Result<CommunicationRecord> {
        let subject = clean_subject(&entry.subject);
        if subject.is_empty() {
            return Err(CrmError::InvalidInput(
                "Communication subject is required".to_string(),
            ));
        }
        let date = crate::format_date(entry.date.unwrap_or_else(crate::today));
        let file_name = format!("{} - {} - {}{}", date, entry.kind, subject, EXTENSION);

        let folder_id = ensure_folder(self.drive, client_id, COMMUNICATIONS)?;
        let file = self
            .drive
            .create_file(&folder_id, &file_name, "text/plain", entry.body.as_bytes())?;
        info!(client_id, file_id = %file.id, kind = %entry.kind, "recorded communication");

        Ok(CommunicationRecord {
            file_id: file.id,
            file_name,
            date,
            kind: Some(entry.kind),
            subject,
        })
    }

    /// Every logged communication, newest first.
    pub fn list(&self, client_id: &str) -> Result<Vec<CommunicationRecord>> {
        let Some(folder) = find_folder(self.drive, client_id, COMMUNICATIONS)? else {
            return Ok(Vec::new());
        };
        let mut records: Vec<CommunicationRecord> = self
            .drive
            .list_children(&folder.id, &ChildQuery::files())?
            .iter()
            .map(|item| CommunicationRecord::from_file(&item.id, &item.name))
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.file_name.cmp(&b.file_name)));
        Ok(records)
    }

    /// Body text of a logged communication.
    pub fn read(&self, file_id: &str) -> Result<String> {
        let bytes = self.drive.download_file(file_id)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{SqliteDrive, ROOT_ID};

    #[test]
    fn test_parse_file_name() {
        let record = CommunicationRecord::from_file("f1", "2025-02-03 - Phone - Annual review - follow up.txt");
        assert_eq!(record.date, "2025-02-03");
        assert_eq!(record.kind, Some(CommunicationKind::Phone));
        assert_eq!(record.subject, "Annual review - follow up");
    }

    #[test]
    fn test_parse_foreign_file_name() {
        let record = CommunicationRecord::from_file("f1", "scan.pdf");
        assert_eq!(record.date, "");
        assert_eq!(record.kind, None);
        assert_eq!(record.subject, "scan.pdf");
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("meeting".parse::<CommunicationKind>().unwrap(), CommunicationKind::Meeting);
        assert!("fax".parse::<CommunicationKind>().is_err());
    }

    #[test]
    fn test_record_list_read() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let log = CommunicationLog::new(&drive);
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();

        log.record(
            ROOT_ID,
            NewCommunication {
                kind: CommunicationKind::Email,
                subject: "Welcome".to_string(),
                body: "Hello Jane".to_string(),
                date: Some(day(2)),
            },
        )
        .unwrap();
        let latest = log
            .record(
                ROOT_ID,
                NewCommunication {
                    kind: CommunicationKind::Letter,
                    subject: "Terms 1/2".to_string(),
                    body: "Enclosed".to_string(),
                    date: Some(day(9)),
                },
            )
            .unwrap();
        assert_eq!(latest.file_name, "2025-01-09 - Letter - Terms 1-2.txt");

        let listed = log.list(ROOT_ID).unwrap();
        let subjects: Vec<&str> = listed.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Terms 1-2", "Welcome"]);
        assert_eq!(log.read(&listed[1].file_id).unwrap(), "Hello Jane");
    }

    #[test]
    fn test_blank_subject_rejected() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let log = CommunicationLog::new(&drive);
        let result = log.record(
            ROOT_ID,
            NewCommunication {
                kind: CommunicationKind::Note,
                subject: "  ".to_string(),
                body: String::new(),
                date: None,
            },
        );
        assert!(matches!(result, Err(CrmError::InvalidInput(_))));
    }
}
