//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge, HEADER_SEPARATOR};

/// Header line for a command.
///
/// Pretty mode: "WealthPro · command (context)"
/// Plain mode: "wealthpro command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("WealthPro", styles::bold(), ctx.color);
            let sep = HEADER_SEPARATOR.get(ctx.unicode);
            match context {
                Some(c) => format!("{} {} {} ({})", title, sep, command, c),
                None => format!("{} {} {}", title, sep, command),
            }
        }
        OutputMode::Plain => format!("wealthpro {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Section heading inside a pretty report.
pub fn section(ctx: &UiContext, title: &str) -> String {
    if ctx.mode.is_pretty() {
        styled(title, styles::bold(), ctx.color)
    } else {
        format!("section={}", title.to_lowercase().replace(' ', "_"))
    }
}

pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Key-value pair.
///
/// Pretty mode: "Key: value" with a dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Summary block after an action.
///
/// Pretty mode: badge plus indented key-value pairs
/// Plain mode: `status=ok` plus key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }
    lines.join("\n")
}

/// Notice for an action that changed nothing.
pub fn unchanged(ctx: &UiContext, message: &str) -> String {
    if ctx.mode.is_pretty() {
        badge(ctx, Badge::Info, message)
    } else {
        "status=unchanged".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Bordered table in pretty mode, space-separated rows in plain mode.
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width.min(u16::MAX as usize) as u16);
    table.set_header(columns.iter().map(|c| c.header).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Borderless table for lists.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| {
            let cell = Cell::new(c.header);
            if ctx.color {
                cell.add_attribute(Attribute::Dim)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header_cells);

    for i in 0..columns.len() {
        if let Some(column) = table.column_mut(i) {
            column.set_padding((0, 2));
        }
    }
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn plain_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Error message with optional hint.
///
/// Pretty mode: "[ERR] message" then "Hint: ..."
/// Plain mode: "error=message" then "hint=..."
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }
    lines.join("\n")
}

pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(mode: OutputMode) -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            width: 100,
            mode,
        }
    }

    #[test]
    fn test_header_modes() {
        assert_eq!(header(&ctx(OutputMode::Plain), "clients list", None), "wealthpro clients list");
        let pretty = header(&ctx(OutputMode::Pretty), "tasks upcoming", Some("30 days"));
        assert_eq!(pretty, "WealthPro \u{00B7} tasks upcoming (30 days)");
        assert!(header(&ctx(OutputMode::Json), "x", None).is_empty());
    }

    #[test]
    fn test_kv_plain_normalizes_key() {
        assert_eq!(kv(&ctx(OutputMode::Plain), "Due Date", "2025-05-01"), "due_date=2025-05-01");
        assert_eq!(kv(&ctx(OutputMode::Pretty), "Due Date", "2025-05-01"), "Due Date: 2025-05-01");
    }

    #[test]
    fn test_receipt_plain() {
        let out = receipt(
            &ctx(OutputMode::Plain),
            "Client created",
            &[("ID", "abc"), ("Name", "Jane Doe")],
        );
        assert_eq!(out, "status=ok\nid=abc\nname=Jane Doe");
    }

    #[test]
    fn test_receipt_pretty_indents_items() {
        let out = receipt(&ctx(OutputMode::Pretty), "Task completed", &[("ID", "T1")]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("Task completed"));
        assert_eq!(lines[1], "  ID: T1");
    }

    #[test]
    fn test_unchanged() {
        assert_eq!(unchanged(&ctx(OutputMode::Plain), "Already archived"), "status=unchanged");
        assert!(unchanged(&ctx(OutputMode::Pretty), "Already archived").contains("Already archived"));
    }

    #[test]
    fn test_simple_table_plain_has_no_header() {
        let rows = vec![
            vec!["c1".to_string(), "Jane".to_string()],
            vec!["c2".to_string(), "John".to_string()],
        ];
        let out = simple_table(&ctx(OutputMode::Plain), &[Column::new("ID"), Column::new("Name")], &rows);
        assert_eq!(out, "c1 Jane\nc2 John");
    }

    #[test]
    fn test_tables_pretty_include_headers() {
        let rows = vec![vec!["T1".to_string(), "Call client".to_string()]];
        let columns = [Column::new("ID"), Column::new("Title")];
        for out in [
            simple_table(&ctx(OutputMode::Pretty), &columns, &rows),
            table(&ctx(OutputMode::Pretty), &columns, &rows),
        ] {
            assert!(out.contains("Title"));
            assert!(out.contains("Call client"));
        }
    }

    #[test]
    fn test_error_message() {
        let plain = error_message(&ctx(OutputMode::Plain), "Client not found", Some("wealthpro clients list"));
        assert_eq!(plain, "error=Client not found\nhint=wealthpro clients list");
        let pretty = error_message(&ctx(OutputMode::Pretty), "Client not found", None);
        assert!(pretty.starts_with("[\u{2717}]"));
    }
}
