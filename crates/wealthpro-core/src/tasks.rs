//! Task ledger.
//!
//! Tasks live as rows of the shared `Tasks` sheet, one row per task under a
//! fixed 11-column header. The sheet is authoritative. Each task may also be
//! mirrored as a plain-text stub file in the client's `Tasks/Ongoing Tasks`
//! folder; the mirror is updated after the row and its failures are logged
//! and dropped.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clients::ClientRecord;
use crate::drive::{ChildQuery, DriveClient, SheetRange};
use crate::error::{CrmError, Result};
use crate::folders::{ensure_folder, find_folder};
use crate::layout::{COMPLETED_TASKS, ONGOING_TASKS, TASKS, TASKS_SHEET, TASK_HEADER};
use crate::workspace::WorkspaceLayout;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_COMPLETED: &str = "Completed";

const COLUMNS: usize = TASK_HEADER.len();

/// One ledger row. Every field is the raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub client_id: String,
    pub task_type: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    pub status: String,
    pub created_date: String,
    pub completed_date: String,
    pub time_spent: String,
}

impl TaskRecord {
    /// Map a sheet row to a record, padding short rows with empty cells.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
        Self {
            task_id: cell(0),
            client_id: cell(1),
            task_type: cell(2),
            title: cell(3),
            description: cell(4),
            due_date: cell(5),
            priority: cell(6),
            status: cell(7),
            created_date: cell(8),
            completed_date: cell(9),
            time_spent: cell(10),
        }
    }

    /// Cells in header order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.task_id.clone(),
            self.client_id.clone(),
            self.task_type.clone(),
            self.title.clone(),
            self.description.clone(),
            self.due_date.clone(),
            self.priority.clone(),
            self.status.clone(),
            self.created_date.clone(),
            self.completed_date.clone(),
            self.time_spent.clone(),
        ]
    }

    pub fn is_completed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(STATUS_COMPLETED)
    }

    /// Due date parsed as `YYYY-MM-DD`, then `DD/MM/YYYY`.
    pub fn due(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }

    /// File name of the stub mirroring this task.
    pub fn stub_name(&self) -> String {
        format!("{}{}).txt", self.stub_prefix(), self.task_id)
    }

    /// Prefix shared by every stub written for this due date and title.
    pub fn stub_prefix(&self) -> String {
        format!("{} - {} (", self.due_date, self.title)
    }

    fn stub_body(&self) -> String {
        let mut body = String::new();
        for (name, value) in TASK_HEADER.iter().zip(self.to_row()) {
            body.push_str(name);
            body.push_str(": ");
            body.push_str(&value);
            body.push('\n');
        }
        body
    }
}

/// Parse a due date cell. Unrecognised text yields `None`.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, crate::DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

/// A task as supplied by the caller.
///
/// `status` defaults to `Pending` and `created_date` to today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub task_id: String,
    pub client_id: String,
    pub task_type: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    pub status: Option<String>,
    pub created_date: Option<String>,
    pub time_spent: String,
}

impl NewTask {
    pub fn new(
        task_id: impl Into<String>,
        client_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            client_id: client_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn into_record(self, today: NaiveDate) -> TaskRecord {
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| STATUS_PENDING.to_string());
        let created_date = self
            .created_date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| crate::format_date(today));
        TaskRecord {
            task_id: self.task_id,
            client_id: self.client_id,
            task_type: self.task_type,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            status,
            created_date,
            completed_date: String::new(),
            time_spent: self.time_spent,
        }
    }
}

/// Secondary copy of the ledger that may fail without affecting it.
pub trait TaskMirror {
    /// Called after a row has been appended.
    fn task_added(&self, task: &TaskRecord, client: Option<&ClientRecord>) -> Result<()>;

    /// Called after a row has been marked completed.
    fn task_completed(&self, task: &TaskRecord) -> Result<()>;
}

/// Mirrors tasks as stub files under `Tasks/Ongoing Tasks` and
/// `Tasks/Completed Tasks` of the owning client folder.
pub struct DriveTaskMirror<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
}

impl<'a, D: DriveClient + ?Sized> DriveTaskMirror<'a, D> {
    pub fn new(drive: &'a D) -> Self {
        Self { drive }
    }

    fn tasks_folder(&self, client_id: &str, client: Option<&ClientRecord>) -> Result<String> {
        if let Some(id) = client.and_then(|c| c.subfolders.get(TASKS)) {
            return Ok(id.clone());
        }
        ensure_folder(self.drive, client_id, TASKS)
    }
}

impl<D: DriveClient + ?Sized> TaskMirror for DriveTaskMirror<'_, D> {
    fn task_added(&self, task: &TaskRecord, client: Option<&ClientRecord>) -> Result<()> {
        let client_id = client.map(|c| c.id.as_str()).unwrap_or(&task.client_id);
        if client_id.is_empty() {
            return Err(CrmError::InvalidInput(
                "Task has no client folder to mirror into".to_string(),
            ));
        }
        let tasks_id = self.tasks_folder(client_id, client)?;
        let ongoing_id = ensure_folder(self.drive, &tasks_id, ONGOING_TASKS)?;
        self.drive.create_file(
            &ongoing_id,
            &task.stub_name(),
            "text/plain",
            task.stub_body().as_bytes(),
        )?;
        debug!(task_id = %task.task_id, "wrote task stub");
        Ok(())
    }

    fn task_completed(&self, task: &TaskRecord) -> Result<()> {
        let Some(tasks) = find_folder(self.drive, &task.client_id, TASKS)? else {
            return Err(CrmError::NotFound(format!(
                "Tasks folder for client {}",
                task.client_id
            )));
        };
        let Some(ongoing) = find_folder(self.drive, &tasks.id, ONGOING_TASKS)? else {
            return Err(CrmError::NotFound(format!(
                "Ongoing Tasks folder for client {}",
                task.client_id
            )));
        };

        let prefix = task.stub_prefix();
        let stub = self
            .drive
            .list_children(&ongoing.id, &ChildQuery::files())?
            .into_iter()
            .find(|item| item.name.starts_with(&prefix))
            .ok_or_else(|| CrmError::NotFound(format!("Task stub starting with '{}'", prefix)))?;

        let completed_id = ensure_folder(self.drive, &tasks.id, COMPLETED_TASKS)?;
        self.drive.move_item(&stub.id, &ongoing.id, &completed_id)?;
        debug!(task_id = %task.task_id, stub = %stub.name, "moved task stub to completed");
        Ok(())
    }
}

/// Rows of the `Tasks` sheet.
pub struct TaskLedger<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
    sheet_id: String,
    mirror: Option<Box<dyn TaskMirror + 'a>>,
}

impl<'a, D: DriveClient + ?Sized> TaskLedger<'a, D> {
    /// Open the ledger, rewriting the header row if it is missing or differs.
    pub fn open(drive: &'a D, layout: &WorkspaceLayout) -> Result<Self> {
        let ledger = Self {
            drive,
            sheet_id: layout.tasks_sheet_id.clone(),
            mirror: None,
        };
        ledger.ensure_header()?;
        Ok(ledger)
    }

    /// Attach a best-effort mirror.
    pub fn with_mirror(mut self, mirror: impl TaskMirror + 'a) -> Self {
        self.mirror = Some(Box::new(mirror));
        self
    }

    fn header_range() -> String {
        SheetRange::row(TASKS_SHEET, 1, COLUMNS).to_a1()
    }

    fn data_range() -> String {
        format!("{}!A2:{}", TASKS_SHEET, crate::drive::range::column_letters(COLUMNS - 1))
    }

    fn ensure_header(&self) -> Result<()> {
        let rows = self.drive.read_range(&self.sheet_id, &Self::header_range())?;
        let matches = rows
            .first()
            .map(|row| row.iter().map(String::as_str).eq(TASK_HEADER.iter().copied()))
            .unwrap_or(false);
        if !matches {
            info!(sheet_id = %self.sheet_id, "writing task ledger header");
            let header: Vec<String> = TASK_HEADER.iter().map(|h| h.to_string()).collect();
            self.drive
                .update_range(&self.sheet_id, &Self::header_range(), &[header])?;
        }
        Ok(())
    }

    /// Append a task row, then mirror it.
    pub fn append(&self, task: NewTask, client: Option<&ClientRecord>) -> Result<TaskRecord> {
        self.append_on(task, client, crate::today())
    }

    fn append_on(
        &self,
        task: NewTask,
        client: Option<&ClientRecord>,
        today: NaiveDate,
    ) -> Result<TaskRecord> {
        if task.task_id.trim().is_empty() {
            return Err(CrmError::InvalidInput("Task ID is required".to_string()));
        }
        let record = task.into_record(today);
        self.drive
            .append_rows(&self.sheet_id, &Self::data_range(), &[record.to_row()])?;
        info!(task_id = %record.task_id, client_id = %record.client_id, "appended task");

        if let Some(mirror) = &self.mirror {
            if let Err(err) = mirror.task_added(&record, client) {
                warn!(task_id = %record.task_id, error = %err, "failed to write task stub");
            }
        }
        Ok(record)
    }

    fn rows(&self) -> Result<Vec<Vec<String>>> {
        self.drive.read_range(&self.sheet_id, &Self::data_range())
    }

    /// Every task row, skipping blank rows.
    pub fn list_all(&self) -> Result<Vec<TaskRecord>> {
        Ok(self
            .rows()?
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| TaskRecord::from_row(row))
            .collect())
    }

    /// Tasks whose `client_id` equals `client_id` exactly.
    pub fn for_client(&self, client_id: &str) -> Result<Vec<TaskRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|task| task.client_id == client_id)
            .collect())
    }

    /// First task with the given ID.
    pub fn get(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|task| task.task_id == task_id))
    }

    /// Open tasks due within `days` of today, soonest first.
    pub fn upcoming(&self, days: i64) -> Result<Vec<TaskRecord>> {
        self.upcoming_from(days, crate::today())
    }

    /// Open tasks due on or before `today + days`, soonest first.
    ///
    /// Completed tasks and tasks without a parseable due date are skipped.
    /// Overdue tasks are included. A window past the last representable
    /// date has no upper bound.
    pub fn upcoming_from(&self, days: i64, today: NaiveDate) -> Result<Vec<TaskRecord>> {
        let days = u64::try_from(days).map_err(|_| {
            CrmError::InvalidInput(format!("Days must not be negative (got {})", days))
        })?;
        let cutoff = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
        let mut due: Vec<(NaiveDate, TaskRecord)> = self
            .list_all()?
            .into_iter()
            .filter(|task| !task.is_completed())
            .filter_map(|task| task.due().map(|date| (date, task)))
            .filter(|(date, _)| *date <= cutoff)
            .collect();
        due.sort_by_key(|(date, _)| *date);
        Ok(due.into_iter().map(|(_, task)| task).collect())
    }

    /// Mark every row with `task_id` completed today.
    ///
    /// Each matching row is rewritten in place. Returns `true` if any row
    /// matched, whatever its previous status.
    pub fn complete(&self, task_id: &str) -> Result<bool> {
        self.complete_on(task_id, crate::today())
    }

    fn complete_on(&self, task_id: &str, today: NaiveDate) -> Result<bool> {
        let completed_date = crate::format_date(today);
        let mut changed = Vec::new();
        for (idx, row) in self.rows()?.iter().enumerate() {
            if row.first().map(String::as_str) != Some(task_id) {
                continue;
            }
            let mut task = TaskRecord::from_row(row);
            task.status = STATUS_COMPLETED.to_string();
            task.completed_date = completed_date.clone();

            // Data starts on sheet row 2.
            let range = SheetRange::row(TASKS_SHEET, idx + 2, COLUMNS).to_a1();
            self.drive
                .update_range(&self.sheet_id, &range, &[task.to_row()])?;
            changed.push(task);
        }

        if changed.is_empty() {
            debug!(task_id, "no task row matched");
            return Ok(false);
        }
        info!(task_id, rows = changed.len(), "completed task");

        if let Some(mirror) = &self.mirror {
            for task in &changed {
                if let Err(err) = mirror.task_completed(task) {
                    warn!(task_id, error = %err, "failed to move task stub");
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{SqliteDrive, ROOT_ID};

    fn setup() -> (SqliteDrive, WorkspaceLayout) {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let layout = WorkspaceLayout::bootstrap(&drive, ROOT_ID).unwrap();
        (drive, layout)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_row_pads_short_rows() {
        let row = vec!["T1".to_string(), "C1".to_string()];
        let task = TaskRecord::from_row(&row);
        assert_eq!(task.task_id, "T1");
        assert_eq!(task.client_id, "C1");
        assert_eq!(task.time_spent, "");
        assert_eq!(task.to_row().len(), 11);
    }

    #[test]
    fn test_parse_due_date_formats() {
        assert_eq!(parse_due_date("2025-01-31"), Some(date(2025, 1, 31)));
        assert_eq!(parse_due_date("31/01/2025"), Some(date(2025, 1, 31)));
        assert_eq!(parse_due_date("next week"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn test_stub_name_starts_with_prefix() {
        let task = NewTask::new("T1", "C1", "Review")
            .with_due_date("2025-01-01")
            .into_record(date(2024, 12, 1));
        assert_eq!(task.stub_name(), "2025-01-01 - Review (T1).txt");
        assert!(task.stub_name().starts_with(&task.stub_prefix()));
    }

    #[test]
    fn test_open_writes_header() {
        let (drive, layout) = setup();
        TaskLedger::open(&drive, &layout).unwrap();
        let rows = drive
            .read_range(&layout.tasks_sheet_id, "Tasks!A1:K1")
            .unwrap();
        assert_eq!(rows[0], TASK_HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_open_repairs_mismatched_header() {
        let (drive, layout) = setup();
        drive
            .update_range(&layout.tasks_sheet_id, "Tasks!A1:B1", &[vec!["id".into(), "x".into()]])
            .unwrap();
        TaskLedger::open(&drive, &layout).unwrap();
        let rows = drive
            .read_range(&layout.tasks_sheet_id, "Tasks!A1:K1")
            .unwrap();
        assert_eq!(rows[0][0], "task_id");
        assert_eq!(rows[0].len(), 11);
    }

    #[test]
    fn test_append_defaults() {
        let (drive, layout) = setup();
        let ledger = TaskLedger::open(&drive, &layout).unwrap();
        let task = ledger
            .append_on(NewTask::new("T1", "C1", "Call"), None, date(2025, 3, 4))
            .unwrap();
        assert_eq!(task.status, STATUS_PENDING);
        assert_eq!(task.created_date, "2025-03-04");
        assert_eq!(ledger.list_all().unwrap(), vec![task]);
    }

    #[test]
    fn test_append_requires_task_id() {
        let (drive, layout) = setup();
        let ledger = TaskLedger::open(&drive, &layout).unwrap();
        let result = ledger.append(NewTask::new(" ", "C1", "Call"), None);
        assert!(matches!(result, Err(CrmError::InvalidInput(_))));
    }

    #[test]
    fn test_complete_twice_returns_true() {
        let (drive, layout) = setup();
        let ledger = TaskLedger::open(&drive, &layout).unwrap();
        ledger.append(NewTask::new("T1", "C1", "Call"), None).unwrap();
        ledger.append(NewTask::new("T2", "C1", "Email"), None).unwrap();

        assert!(ledger.complete_on("T1", date(2025, 6, 1)).unwrap());
        assert!(ledger.complete_on("T1", date(2025, 6, 2)).unwrap());
        assert!(!ledger.complete("missing").unwrap());

        let t1 = ledger.get("T1").unwrap().unwrap();
        assert_eq!(t1.status, STATUS_COMPLETED);
        assert_eq!(t1.completed_date, "2025-06-02");
        let t2 = ledger.get("T2").unwrap().unwrap();
        assert_eq!(t2.status, STATUS_PENDING);
    }

    #[test]
    fn test_upcoming_filters_and_sorts() {
        let (drive, layout) = setup();
        let ledger = TaskLedger::open(&drive, &layout).unwrap();
        let today = date(2025, 1, 1);
        let add = |id: &str, due: &str, status: Option<&str>| {
            let mut task = NewTask::new(id, "C1", id).with_due_date(due);
            task.status = status.map(String::from);
            ledger.append_on(task, None, today).unwrap();
        };
        add("edge", "2025-01-31", None);
        add("done", "2025-01-05", Some(" completed "));
        add("vague", "next week", None);
        add("blank", "", None);
        add("late", "2025-02-01", None);
        add("uk", "10/01/2025", None);
        add("overdue", "2024-12-20", None);

        let ids: Vec<String> = ledger
            .upcoming_from(30, today)
            .unwrap()
            .into_iter()
            .map(|t| t.task_id)
            .collect();
        assert_eq!(ids, vec!["overdue", "uk", "edge"]);
    }

    #[test]
    fn test_upcoming_huge_window_has_no_upper_bound() {
        let (drive, layout) = setup();
        let ledger = TaskLedger::open(&drive, &layout).unwrap();
        let today = date(2025, 1, 1);
        ledger
            .append_on(NewTask::new("far", "C1", "Far").with_due_date("2999-12-31"), None, today)
            .unwrap();

        assert_eq!(ledger.upcoming_from(100_000_000, today).unwrap().len(), 1);
        assert_eq!(ledger.upcoming(i64::MAX).unwrap().len(), 1);
    }

    #[test]
    fn test_upcoming_rejects_negative_days() {
        let (drive, layout) = setup();
        let ledger = TaskLedger::open(&drive, &layout).unwrap();
        let result = ledger.upcoming_from(-1, date(2025, 1, 1));
        assert!(matches!(result, Err(CrmError::InvalidInput(_))));
    }
}
