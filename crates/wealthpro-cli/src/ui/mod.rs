//! UI primitives for the WealthPro CLI.
//!
//! - **Context**: terminal detection (width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges, symbols, owo-colors styles
//! - **Render**: headers, tables, receipts, hints, errors
//! - **Format**: cell helpers (truncate, amounts, ids)
//!
//! ```ignore
//! let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
//! if ui.mode.is_json() {
//!     println!("{}", serde_json::to_string_pretty(&records)?);
//!     return Ok(());
//! }
//! println!("{}", header(&ui, "clients list", None));
//! println!("{}", simple_table(&ui, &columns, &rows));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;

pub use render::{
    blank_line, header, hint, kv, print, print_error, receipt, section, simple_table, table,
    unchanged, Column,
};

pub use format::{format_amount, or_dash, short_id, single_line, truncate};
