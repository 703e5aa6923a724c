//! Argument parsing helpers shared by handlers.

use chrono::NaiveDate;
use wealthpro_core::tasks::parse_due_date;
use wealthpro_core::DATE_FORMAT;

use crate::errors::CliError;

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date_flag(flag: &str, value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CliError::invalid_input(format!(
            "Invalid {} '{}' (expected YYYY-MM-DD)",
            flag, value
        ))
        .into()
    })
}

/// Normalize a due date to `YYYY-MM-DD`. Blank stays blank.
pub fn normalize_due_date(value: &str) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    parse_due_date(value)
        .map(wealthpro_core::format_date)
        .ok_or_else(|| {
            CliError::invalid_input(format!(
                "Invalid due date '{}' (expected YYYY-MM-DD or DD/MM/YYYY)",
                value
            ))
            .into()
        })
}

/// Reject negative look-ahead windows.
pub fn require_days(days: i64) -> anyhow::Result<i64> {
    if days < 0 {
        return Err(CliError::invalid_input(format!("--days must be 0 or more (got {})", days)).into());
    }
    Ok(days)
}
