//! Per-client portfolio profile.
//!
//! Stored as `Portfolio/portfolio.json` inside the client folder and
//! rewritten in full on every change. `computed_total` is derived: every
//! mutation recomputes it before writing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::drive::DriveClient;
use crate::error::{CrmError, Result};
use crate::folders::{ensure_folder, find_file, find_folder, write_file};
use crate::layout::{PORTFOLIO, PORTFOLIO_FILE};

/// An investment or pension holding.
///
/// Investments carry `account_number`, pensions carry `plan_number`.
/// `value` is kept as the raw JSON value so hand-edited documents survive a
/// round trip; [`PortfolioItem::amount`] gives the coerced number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioItem {
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_number: Option<String>,
    pub value: Value,
    pub currency: String,
    pub as_of: String,
    pub notes: String,
    pub holdings: Vec<Value>,
}

impl PortfolioItem {
    /// `value` as a number. Anything non-numeric counts as `0.0`.
    pub fn amount(&self) -> f64 {
        coerce_amount(&self.value)
    }

    /// Account number for investments, plan number for pensions.
    pub fn reference(&self) -> &str {
        self.account_number
            .as_deref()
            .or(self.plan_number.as_deref())
            .unwrap_or("")
    }
}

fn coerce_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// The whole portfolio document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioProfile {
    pub investments: Vec<PortfolioItem>,
    pub pensions: Vec<PortfolioItem>,
    pub notes: String,
    pub computed_total: f64,
}

impl PortfolioProfile {
    pub fn is_empty(&self) -> bool {
        self.investments.is_empty() && self.pensions.is_empty() && self.notes.is_empty()
    }

    fn items_mut(&mut self, category: Category) -> &mut Vec<PortfolioItem> {
        match category {
            Category::Investment => &mut self.investments,
            Category::Pension => &mut self.pensions,
        }
    }
}

/// Set `computed_total` to the sum of every item's value.
pub fn recompute_total(profile: &mut PortfolioProfile) {
    profile.computed_total = profile
        .investments
        .iter()
        .chain(profile.pensions.iter())
        .map(PortfolioItem::amount)
        .sum();
}

/// Which list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Investment,
    Pension,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investment => "investment",
            Self::Pension => "pension",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "investment" | "investments" => Ok(Self::Investment),
            "pension" | "pensions" => Ok(Self::Pension),
            other => Err(CrmError::InvalidInput(format!(
                "Unknown portfolio category '{}' (expected investment or pension)",
                other
            ))),
        }
    }
}

/// Partial update for an item. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub reference: Option<String>,
    pub value: Option<Value>,
    pub currency: Option<String>,
    pub as_of: Option<String>,
    pub notes: Option<String>,
    pub holdings: Option<Vec<Value>>,
}

impl ItemPatch {
    fn apply(self, item: &mut PortfolioItem, category: Category) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(provider) = self.provider {
            item.provider = provider;
        }
        if let Some(reference) = self.reference {
            match category {
                Category::Investment => item.account_number = Some(reference),
                Category::Pension => item.plan_number = Some(reference),
            }
        }
        if let Some(value) = self.value {
            item.value = value;
        }
        if let Some(currency) = self.currency {
            item.currency = currency;
        }
        if let Some(as_of) = self.as_of {
            item.as_of = as_of;
        }
        if let Some(notes) = self.notes {
            item.notes = notes;
        }
        if let Some(holdings) = self.holdings {
            item.holdings = holdings;
        }
    }
}

/// Reads and rewrites portfolio documents.
pub struct PortfolioStore<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
}

impl<'a, D: DriveClient + ?Sized> PortfolioStore<'a, D> {
    pub fn new(drive: &'a D) -> Self {
        Self { drive }
    }

    /// Load the client's profile, or an empty one if none has been saved.
    pub fn read(&self, client_id: &str) -> Result<PortfolioProfile> {
        let Some(folder) = find_folder(self.drive, client_id, PORTFOLIO)? else {
            return Ok(PortfolioProfile::default());
        };
        let Some(file) = find_file(self.drive, &folder.id, PORTFOLIO_FILE)? else {
            return Ok(PortfolioProfile::default());
        };
        let bytes = self.drive.download_file(&file.id)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(PortfolioProfile::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Overwrite the client's profile document.
    pub fn write(&self, client_id: &str, profile: &PortfolioProfile) -> Result<()> {
        let folder_id = ensure_folder(self.drive, client_id, PORTFOLIO)?;
        let json = serde_json::to_vec_pretty(profile)?;
        write_file(self.drive, &folder_id, PORTFOLIO_FILE, "application/json", &json)?;
        Ok(())
    }

    fn save(&self, client_id: &str, profile: &mut PortfolioProfile) -> Result<()> {
        recompute_total(profile);
        self.write(client_id, profile)
    }

    /// Add an item, assigning an ID if it has none.
    pub fn add_item(
        &self,
        client_id: &str,
        category: Category,
        mut item: PortfolioItem,
    ) -> Result<PortfolioItem> {
        if item.id.trim().is_empty() {
            item.id = Uuid::new_v4().to_string();
        }
        let mut profile = self.read(client_id)?;
        profile.items_mut(category).push(item.clone());
        self.save(client_id, &mut profile)?;
        info!(client_id, item_id = %item.id, category = %category, "added portfolio item");
        Ok(item)
    }

    /// Apply `patch` to the item with `item_id`. Returns `false` if absent.
    pub fn edit_item(
        &self,
        client_id: &str,
        category: Category,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<bool> {
        let mut profile = self.read(client_id)?;
        let Some(item) = profile
            .items_mut(category)
            .iter_mut()
            .find(|item| item.id == item_id)
        else {
            return Ok(false);
        };
        patch.apply(item, category);
        self.save(client_id, &mut profile)?;
        info!(client_id, item_id, "edited portfolio item");
        Ok(true)
    }

    /// Remove the item with `item_id`. Returns `false` if absent.
    pub fn delete_item(&self, client_id: &str, category: Category, item_id: &str) -> Result<bool> {
        let mut profile = self.read(client_id)?;
        let items = profile.items_mut(category);
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(client_id, &mut profile)?;
        info!(client_id, item_id, "removed portfolio item");
        Ok(true)
    }

    /// Replace the free-text notes.
    pub fn save_notes(&self, client_id: &str, notes: &str) -> Result<PortfolioProfile> {
        let mut profile = self.read(client_id)?;
        profile.notes = notes.to_string();
        self.save(client_id, &mut profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{SqliteDrive, ROOT_ID};
    use serde_json::json;

    fn item(name: &str, value: Value) -> PortfolioItem {
        PortfolioItem {
            name: name.to_string(),
            value,
            ..PortfolioItem::default()
        }
    }

    #[test]
    fn test_recompute_total_coerces_and_is_idempotent() {
        let mut profile = PortfolioProfile {
            investments: vec![item("ISA", json!(1000.5)), item("GIA", json!("250"))],
            pensions: vec![item("SIPP", json!("n/a")), item("DB", Value::Null)],
            ..PortfolioProfile::default()
        };
        recompute_total(&mut profile);
        assert_eq!(profile.computed_total, 1250.5);
        recompute_total(&mut profile);
        assert_eq!(profile.computed_total, 1250.5);
    }

    #[test]
    fn test_missing_keys_default() {
        let profile: PortfolioProfile =
            serde_json::from_str(r#"{"investments":[{"name":"ISA"}]}"#).unwrap();
        assert_eq!(profile.investments[0].name, "ISA");
        assert_eq!(profile.investments[0].amount(), 0.0);
        assert!(profile.pensions.is_empty());
        assert_eq!(profile.notes, "");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Pensions".parse::<Category>().unwrap(), Category::Pension);
        assert!("cash".parse::<Category>().is_err());
    }

    #[test]
    fn test_read_missing_profile_is_empty() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let store = PortfolioStore::new(&drive);
        let profile = store.read(ROOT_ID).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.computed_total, 0.0);
    }

    #[test]
    fn test_mutations_keep_total_fresh() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let store = PortfolioStore::new(&drive);
        let isa = store
            .add_item(ROOT_ID, Category::Investment, item("ISA", json!(100)))
            .unwrap();
        assert!(!isa.id.is_empty());
        store
            .add_item(ROOT_ID, Category::Pension, item("SIPP", json!(50)))
            .unwrap();
        assert_eq!(store.read(ROOT_ID).unwrap().computed_total, 150.0);

        let patch = ItemPatch {
            value: Some(json!(300)),
            reference: Some("ACC-1".to_string()),
            ..ItemPatch::default()
        };
        assert!(store
            .edit_item(ROOT_ID, Category::Investment, &isa.id, patch)
            .unwrap());
        let profile = store.read(ROOT_ID).unwrap();
        assert_eq!(profile.computed_total, 350.0);
        assert_eq!(profile.investments[0].name, "ISA");
        assert_eq!(profile.investments[0].account_number.as_deref(), Some("ACC-1"));

        assert!(store.delete_item(ROOT_ID, Category::Investment, &isa.id).unwrap());
        assert!(!store.delete_item(ROOT_ID, Category::Investment, &isa.id).unwrap());
        assert_eq!(store.read(ROOT_ID).unwrap().computed_total, 50.0);
    }

    #[test]
    fn test_edit_missing_item_returns_false() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let store = PortfolioStore::new(&drive);
        let edited = store
            .edit_item(ROOT_ID, Category::Pension, "nope", ItemPatch::default())
            .unwrap();
        assert!(!edited);
    }
}
