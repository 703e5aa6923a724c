//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (anything not classified below)
/// - 2: Usage error (reported by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Client, task, portfolio item or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Missing root folder, credential or unreadable config.
    pub const CONFIG: i32 = 5;

    /// The drive service rejected or failed a request.
    pub const REMOTE: i32 = 6;
}

/// Hint shown whenever a client reference does not resolve.
pub const CLIENT_LIST_HINT: &str = "Run `wealthpro clients list` to see client names and IDs.";
