//! Remembered option lists.
//!
//! Values offered when entering tasks and portfolio items (task types,
//! priorities, providers). Kept in `settings.json` under the root folder and
//! grown as new values are used.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drive::DriveClient;
use crate::error::{CrmError, Result};
use crate::folders::{find_file, write_file};
use crate::layout::SETTINGS_FILE;

/// Which remembered list a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionList {
    TaskTypes,
    Priorities,
    Providers,
}

impl OptionList {
    pub const ALL: [OptionList; 3] = [Self::TaskTypes, Self::Priorities, Self::Providers];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskTypes => "task_types",
            Self::Priorities => "priorities",
            Self::Providers => "providers",
        }
    }
}

impl fmt::Display for OptionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionList {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "task_types" | "task_type" | "types" => Ok(Self::TaskTypes),
            "priorities" | "priority" => Ok(Self::Priorities),
            "providers" | "provider" => Ok(Self::Providers),
            other => Err(CrmError::InvalidInput(format!(
                "Unknown option list '{}' (expected task_types, priorities or providers)",
                other
            ))),
        }
    }
}

/// The settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionLists {
    pub task_types: Vec<String>,
    pub priorities: Vec<String>,
    pub providers: Vec<String>,
}

impl Default for OptionLists {
    fn default() -> Self {
        let owned = |values: &[&str]| -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        };
        Self {
            task_types: owned(&[
                "Annual Review",
                "Client Meeting",
                "Phone Call",
                "Email",
                "Paperwork",
                "Compliance",
            ]),
            priorities: owned(&["High", "Medium", "Low"]),
            providers: Vec::new(),
        }
    }
}

impl OptionLists {
    pub fn values(&self, list: OptionList) -> &[String] {
        match list {
            OptionList::TaskTypes => &self.task_types,
            OptionList::Priorities => &self.priorities,
            OptionList::Providers => &self.providers,
        }
    }

    fn values_mut(&mut self, list: OptionList) -> &mut Vec<String> {
        match list {
            OptionList::TaskTypes => &mut self.task_types,
            OptionList::Priorities => &mut self.priorities,
            OptionList::Providers => &mut self.providers,
        }
    }

    /// Add `value` unless an equal value (ignoring case) is present.
    ///
    /// Returns `true` if the list changed.
    pub fn insert(&mut self, list: OptionList, value: &str) -> bool {
        let value = value.trim();
        let values = self.values_mut(list);
        if value.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(value)) {
            return false;
        }
        values.push(value.to_string());
        true
    }
}

/// Loads and persists [`OptionLists`] for one root folder.
pub struct SettingsStore<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
    root_id: &'a str,
}

impl<'a, D: DriveClient + ?Sized> SettingsStore<'a, D> {
    pub fn new(drive: &'a D, root_id: &'a str) -> Self {
        Self { drive, root_id }
    }

    /// Saved lists, or the defaults when nothing has been saved.
    pub fn load(&self) -> Result<OptionLists> {
        let Some(file) = find_file(self.drive, self.root_id, SETTINGS_FILE)? else {
            return Ok(OptionLists::default());
        };
        let bytes = self.drive.download_file(&file.id)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, lists: &OptionLists) -> Result<()> {
        let json = serde_json::to_vec_pretty(lists)?;
        write_file(self.drive, self.root_id, SETTINGS_FILE, "application/json", &json)?;
        Ok(())
    }

    /// Remember `value` in `list`, persisting only when it is new.
    pub fn remember(&self, list: OptionList, value: &str) -> Result<bool> {
        if value.trim().is_empty() {
            return Err(CrmError::InvalidInput("Option value is empty".to_string()));
        }
        let mut lists = self.load()?;
        if !lists.insert(list, value) {
            return Ok(false);
        }
        self.save(&lists)?;
        info!(list = %list, value = value.trim(), "remembered option");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{ChildQuery, SqliteDrive, ROOT_ID};

    #[test]
    fn test_load_defaults_without_file() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let store = SettingsStore::new(&drive, ROOT_ID);
        let lists = store.load().unwrap();
        assert_eq!(lists, OptionLists::default());
        assert!(drive
            .list_children(ROOT_ID, &ChildQuery::files())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_remember_dedups_case_insensitively() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let store = SettingsStore::new(&drive, ROOT_ID);
        assert!(store.remember(OptionList::Providers, " Aviva ").unwrap());
        assert!(!store.remember(OptionList::Providers, "AVIVA").unwrap());
        assert!(!store.remember(OptionList::Priorities, "high").unwrap());

        let lists = store.load().unwrap();
        assert_eq!(lists.providers, vec!["Aviva".to_string()]);
        assert_eq!(lists.priorities.len(), 3);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let lists: OptionLists = serde_json::from_str(r#"{"providers":["Aegon"]}"#).unwrap();
        assert_eq!(lists.providers, vec!["Aegon".to_string()]);
        assert_eq!(lists.priorities, OptionLists::default().priorities);
    }

    #[test]
    fn test_list_name_parse() {
        assert_eq!("task-types".parse::<OptionList>().unwrap(), OptionList::TaskTypes);
        assert!("colours".parse::<OptionList>().is_err());
    }
}
