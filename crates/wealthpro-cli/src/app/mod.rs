//! Application-level utilities for the WealthPro CLI.
//!
//! - Application context (CLI args + lazily opened drive and layout)
//! - Config, backend and client resolution

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::{require_client, resolve_config_path, ACCESS_TOKEN_ENV};
