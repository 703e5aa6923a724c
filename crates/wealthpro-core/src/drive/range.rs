//! A1-notation ranges (`Tasks!A2:K`, `Tasks!A1:K1`, `Tasks!A:K`).

use crate::error::{CrmError, Result};

/// A parsed spreadsheet range.
///
/// Columns are 0-based, rows are 1-based. An open-ended range
/// (`A2:K`) has no `end_row`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub start_col: usize,
    pub start_row: usize,
    pub end_col: usize,
    pub end_row: Option<usize>,
}

impl SheetRange {
    /// Parse an A1 range. The sheet name is required.
    pub fn parse(value: &str) -> Result<Self> {
        let (sheet, cells) = value
            .rsplit_once('!')
            .ok_or_else(|| CrmError::InvalidInput(format!("Range has no sheet: {}", value)))?;
        let sheet = sheet.trim_matches('\'').to_string();
        if sheet.is_empty() {
            return Err(CrmError::InvalidInput(format!(
                "Range has an empty sheet name: {}",
                value
            )));
        }

        let (start, end) = match cells.split_once(':') {
            Some((start, end)) => (start, Some(end)),
            None => (cells, None),
        };

        let (start_col, start_row) = parse_cell(start)
            .ok_or_else(|| CrmError::InvalidInput(format!("Invalid range start: {}", value)))?;
        let (end_col, end_row) = match end {
            Some(end) => parse_cell(end)
                .ok_or_else(|| CrmError::InvalidInput(format!("Invalid range end: {}", value)))?,
            None => (start_col, start_row),
        };

        if end_col < start_col {
            return Err(CrmError::InvalidInput(format!(
                "Range columns are reversed: {}",
                value
            )));
        }
        if let (Some(start), Some(end)) = (start_row, end_row) {
            if end < start {
                return Err(CrmError::InvalidInput(format!(
                    "Range rows are reversed: {}",
                    value
                )));
            }
        }

        // `A:K` covers whole columns; `A2:K` is open-ended below row 2.
        let start_row_value = start_row.unwrap_or(1);
        let end_row = match end {
            Some(_) => end_row,
            None => Some(start_row_value),
        };

        Ok(Self {
            sheet,
            start_col,
            start_row: start_row_value,
            end_col,
            end_row,
        })
    }

    /// Build a range covering `width` columns of a single row.
    pub fn row(sheet: &str, row: usize, width: usize) -> Self {
        Self {
            sheet: sheet.to_string(),
            start_col: 0,
            start_row: row,
            end_col: width.saturating_sub(1),
            end_row: Some(row),
        }
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Render back to A1 notation.
    pub fn to_a1(&self) -> String {
        let start = format!("{}{}", column_letters(self.start_col), self.start_row);
        let end = match self.end_row {
            Some(row) => format!("{}{}", column_letters(self.end_col), row),
            None => column_letters(self.end_col),
        };
        format!("{}!{}:{}", self.sheet, start, end)
    }
}

/// Convert a 0-based column index to letters (`0 -> A`, `26 -> AA`).
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

fn parse_cell(cell: &str) -> Option<(usize, Option<usize>)> {
    let cell = cell.trim();
    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);
    let col = column_index(letters)?;
    if digits.is_empty() {
        return Some((col, None));
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col, Some(row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_range() {
        let range = SheetRange::parse("Tasks!A1:K1").unwrap();
        assert_eq!(range.sheet, "Tasks");
        assert_eq!(range.start_col, 0);
        assert_eq!(range.end_col, 10);
        assert_eq!(range.start_row, 1);
        assert_eq!(range.end_row, Some(1));
        assert_eq!(range.width(), 11);
    }

    #[test]
    fn test_parse_open_ended_rows() {
        let range = SheetRange::parse("Tasks!A2:K").unwrap();
        assert_eq!(range.start_row, 2);
        assert_eq!(range.end_row, None);
    }

    #[test]
    fn test_parse_whole_columns() {
        let range = SheetRange::parse("Tasks!A:K").unwrap();
        assert_eq!(range.start_row, 1);
        assert_eq!(range.end_row, None);
    }

    #[test]
    fn test_parse_quoted_sheet() {
        let range = SheetRange::parse("'My Tasks'!B3").unwrap();
        assert_eq!(range.sheet, "My Tasks");
        assert_eq!(range.start_col, 1);
        assert_eq!(range.end_row, Some(3));
    }

    #[test]
    fn test_parse_rejects_missing_sheet() {
        assert!(SheetRange::parse("A1:K1").is_err());
        assert!(SheetRange::parse("Tasks!K1:A1").is_err());
        assert!(SheetRange::parse("Tasks!A0").is_err());
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(10), "K");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_index("AA"), Some(26));
    }

    #[test]
    fn test_row_range_to_a1() {
        assert_eq!(SheetRange::row("Tasks", 7, 11).to_a1(), "Tasks!A7:K7");
        assert_eq!(SheetRange::parse("Tasks!A2:K").unwrap().to_a1(), "Tasks!A2:K");
    }
}
