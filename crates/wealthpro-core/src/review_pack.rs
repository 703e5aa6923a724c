//! Annual review pack.
//!
//! `Reviews/Review <year>/` with eight fixed categories, plus a meeting
//! agenda and a valuation summary generated into `Agenda & Valuation`.
//! Folders are reused on repeat runs; the documents are uploaded again
//! every time.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::clients::ClientRecord;
use crate::drive::DriveClient;
use crate::error::{CrmError, Result};
use crate::folders::{ensure_folder, ensure_folders};
use crate::layout::{review_folder_name, AGENDA_AND_VALUATION, REVIEWS, REVIEW_SUBFOLDERS};
use crate::names::full_name;
use crate::portfolio::{recompute_total, PortfolioItem, PortfolioProfile, PortfolioStore};

const DOCUMENT_MIME: &str = "text/markdown";

/// IDs produced by [`ReviewPackBuilder::create_pack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackResult {
    pub year_folder_id: String,
    pub subfolders: BTreeMap<String, String>,
    pub agenda_file_id: String,
    pub valuation_file_id: String,
}

pub struct ReviewPackBuilder<'a, D: DriveClient + ?Sized> {
    drive: &'a D,
}

impl<'a, D: DriveClient + ?Sized> ReviewPackBuilder<'a, D> {
    pub fn new(drive: &'a D) -> Self {
        Self { drive }
    }

    /// Build this year's review pack for `client`.
    pub fn create_pack(&self, client: &ClientRecord) -> Result<PackResult> {
        self.create_pack_on(client, crate::today())
    }

    /// Build the review pack for the year of `today`.
    pub fn create_pack_on(&self, client: &ClientRecord, today: NaiveDate) -> Result<PackResult> {
        let name = full_name(&client.first_name, &client.last_name, &client.display_name);
        let date = crate::format_date(today);

        let reviews_id = match client.subfolders.get(REVIEWS) {
            Some(id) => id.clone(),
            None => ensure_folder(self.drive, &client.id, REVIEWS)?,
        };
        let year_folder_id =
            ensure_folder(self.drive, &reviews_id, &review_folder_name(today.year()))?;
        let subfolders = ensure_folders(self.drive, &year_folder_id, &REVIEW_SUBFOLDERS)?;
        let target = subfolders.get(AGENDA_AND_VALUATION).ok_or_else(|| {
            CrmError::Other(format!("{} folder was not created", AGENDA_AND_VALUATION))
        })?;

        // The stored total may predate the items it sits next to.
        let mut profile = PortfolioStore::new(self.drive).read(&client.id)?;
        recompute_total(&mut profile);

        let agenda = self.drive.create_file(
            target,
            &format!("Meeting Agenda - {} - {}.md", name, date),
            DOCUMENT_MIME,
            agenda_document(&name, &date).as_bytes(),
        )?;
        let valuation = self.drive.create_file(
            target,
            &format!("Valuation Summary - {} - {}.md", name, date),
            DOCUMENT_MIME,
            valuation_document(&name, &date, &profile).as_bytes(),
        )?;

        info!(client_id = %client.id, year = today.year(), "created review pack");

        Ok(PackResult {
            year_folder_id,
            subfolders,
            agenda_file_id: agenda.id,
            valuation_file_id: valuation.id,
        })
    }
}

/// Meeting agenda for an annual review.
pub fn agenda_document(name: &str, date: &str) -> String {
    format!(
        "# Annual Review Meeting Agenda\n\
         \n\
         **Client:** {name}\n\
         **Date:** {date}\n\
         \n\
         ## Agenda\n\
         \n\
         1. Welcome and introductions\n\
         2. Review of personal circumstances\n\
         3. Review of objectives and attitude to risk\n\
         4. Portfolio performance and valuation\n\
         5. Pension review\n\
         6. Recommendations\n\
         7. Any other business\n\
         8. Next steps and actions\n\
         \n\
         ## Notes\n\
         \n"
    )
}

/// Valuation summary, listing portfolio items when there are any.
pub fn valuation_document(name: &str, date: &str, profile: &PortfolioProfile) -> String {
    let mut doc = format!(
        "# Valuation Summary\n\
         \n\
         **Client:** {name}\n\
         **Valuation date:** {date}\n\
         \n"
    );

    write_section(&mut doc, "Investments", &profile.investments);
    write_section(&mut doc, "Pensions", &profile.pensions);

    let _ = writeln!(doc, "## Total\n\n**{:.2}**\n", profile.computed_total);
    if !profile.notes.trim().is_empty() {
        let _ = writeln!(doc, "## Notes\n\n{}\n", profile.notes.trim());
    }
    doc
}

fn write_section(doc: &mut String, title: &str, items: &[PortfolioItem]) {
    let _ = writeln!(doc, "## {}\n", title);
    if items.is_empty() {
        doc.push_str("_None recorded_\n\n");
        return;
    }
    doc.push_str("| Name | Provider | Reference | Value | As of |\n");
    doc.push_str("|------|----------|-----------|-------|-------|\n");
    for item in items {
        let _ = writeln!(
            doc,
            "| {} | {} | {} | {:.2} {} | {} |",
            item.name,
            item.provider,
            item.reference(),
            item.amount(),
            item.currency,
            item.as_of
        );
    }
    doc.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agenda_mentions_client_and_date() {
        let doc = agenda_document("Jane Doe", "2025-04-01");
        assert!(doc.contains("**Client:** Jane Doe"));
        assert!(doc.contains("**Date:** 2025-04-01"));
    }

    #[test]
    fn test_valuation_empty_profile() {
        let doc = valuation_document("Jane Doe", "2025-04-01", &PortfolioProfile::default());
        assert!(doc.contains("_None recorded_"));
        assert!(doc.contains("**0.00**"));
    }

    #[test]
    fn test_valuation_lists_items() {
        let profile = PortfolioProfile {
            investments: vec![PortfolioItem {
                name: "Stocks ISA".to_string(),
                provider: "Vanguard".to_string(),
                account_number: Some("ACC-9".to_string()),
                value: json!(1234.5),
                currency: "GBP".to_string(),
                ..PortfolioItem::default()
            }],
            computed_total: 1234.5,
            ..PortfolioProfile::default()
        };
        let doc = valuation_document("Jane Doe", "2025-04-01", &profile);
        assert!(doc.contains("| Stocks ISA | Vanguard | ACC-9 | 1234.50 GBP |"));
        assert!(doc.contains("**1234.50**"));
    }
}
