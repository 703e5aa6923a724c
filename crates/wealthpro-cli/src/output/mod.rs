//! Output formatting helpers for the CLI.
//!
//! Record printing for JSON, plain and pretty modes.

mod json;
mod text;

pub use json::{client_summary_json, print_json, tasks_json, task_json};
pub use text::{
    client_name_map, print_client, print_client_list, print_portfolio, print_task,
    print_task_list,
};
