use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use wealthpro_core::VERSION;

use crate::config::Backend;

/// WealthPro - client records, tasks and review packs for financial advisers
#[derive(Parser)]
#[command(name = "wealthpro")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Drive backend (overrides config)
    #[arg(long, value_enum, env = "WEALTHPRO_BACKEND")]
    pub backend: Option<Backend>,

    /// Root folder ID (overrides config)
    #[arg(long, env = "WEALTHPRO_ROOT_FOLDER_ID")]
    pub root: Option<String>,

    /// Local drive file (overrides config)
    #[arg(long, env = "WEALTHPRO_LOCAL_PATH")]
    pub local_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Drive backend to use
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Local drive file (local backend)
    #[arg(long)]
    pub local_path: Option<String>,

    /// Root folder ID (google backend)
    #[arg(long)]
    pub root_folder_id: Option<String>,

    /// HTTP timeout in seconds (google backend)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Output flags shared by list/show commands
#[derive(Args)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

// ---------------------------------------------------------------------------
// clients
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsSubcommand,
}

#[derive(Subcommand)]
pub enum ClientsSubcommand {
    /// List active and archived clients
    List(ClientListArgs),
    /// Create a client folder tree
    Add(ClientAddArgs),
    /// Show one client and its folders
    Show(ClientRefOutputArgs),
    /// Move a client to Archived Clients
    Archive(ClientRefArgs),
    /// Move an archived client back to Active Clients
    Restore(ClientRefArgs),
    /// Trash a client folder
    Delete(ClientDeleteArgs),
}

#[derive(Args)]
pub struct ClientListArgs {
    /// Only active clients
    #[arg(long, conflicts_with = "archived")]
    pub active: bool,

    /// Only archived clients
    #[arg(long)]
    pub archived: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ClientAddArgs {
    /// Display name ("Surname, Firstname")
    #[arg(value_name = "NAME")]
    pub display_name: Option<String>,

    /// First name (with --last, builds "Last, First")
    #[arg(long)]
    pub first: Option<String>,

    /// Last name
    #[arg(long)]
    pub last: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClientRefArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,
}

#[derive(Args)]
pub struct ClientRefOutputArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ClientDeleteArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// Skip the confirmation requirement
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksSubcommand,
}

#[derive(Subcommand)]
pub enum TasksSubcommand {
    /// Add a task for a client
    Add(TaskAddArgs),
    /// List tasks
    List(TaskListArgs),
    /// Open tasks due soon (overdue included)
    Upcoming(TaskUpcomingArgs),
    /// Show one task
    Show(TaskShowArgs),
    /// Mark a task completed
    Complete(TaskIdArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    #[arg(long)]
    pub title: String,

    /// Due date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub due: Option<String>,

    /// Task type (e.g. "Annual Review")
    #[arg(long = "type", value_name = "TYPE")]
    pub task_type: Option<String>,

    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Task ID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Initial status (default: Pending)
    #[arg(long)]
    pub status: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Only tasks for this client (folder ID or display name)
    #[arg(long)]
    pub client: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct TaskUpcomingArgs {
    /// Look-ahead window in days (default from config)
    #[arg(long)]
    pub days: Option<i64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct TaskShowArgs {
    #[arg(value_name = "TASK_ID")]
    pub task_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TaskIdArgs {
    #[arg(value_name = "TASK_ID")]
    pub task_id: String,
}

// ---------------------------------------------------------------------------
// portfolio
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PortfolioArgs {
    #[command(subcommand)]
    pub command: PortfolioSubcommand,
}

#[derive(Subcommand)]
pub enum PortfolioSubcommand {
    /// Show a client's investments, pensions and total
    Show(ClientRefOutputArgs),
    /// Add an investment or pension
    Add(PortfolioAddArgs),
    /// Change fields of an existing item
    Edit(PortfolioEditArgs),
    /// Remove an item
    Remove(PortfolioItemArgs),
    /// Replace the portfolio notes
    Notes(PortfolioNotesArgs),
}

#[derive(Args)]
pub struct PortfolioAddArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// investment or pension
    #[arg(value_name = "CATEGORY")]
    pub category: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub provider: Option<String>,

    /// Account number (investment) or plan number (pension)
    #[arg(long)]
    pub reference: Option<String>,

    #[arg(long)]
    pub value: Option<f64>,

    #[arg(long, default_value = "GBP")]
    pub currency: String,

    /// Valuation date (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PortfolioEditArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// investment or pension
    #[arg(value_name = "CATEGORY")]
    pub category: String,

    #[arg(value_name = "ITEM_ID")]
    pub item_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub provider: Option<String>,

    #[arg(long)]
    pub reference: Option<String>,

    #[arg(long)]
    pub value: Option<f64>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub as_of: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct PortfolioItemArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// investment or pension
    #[arg(value_name = "CATEGORY")]
    pub category: String,

    #[arg(value_name = "ITEM_ID")]
    pub item_id: String,
}

#[derive(Args)]
pub struct PortfolioNotesArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// New notes text (empty clears)
    #[arg(value_name = "TEXT")]
    pub text: String,
}

// ---------------------------------------------------------------------------
// review, comms, options
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ReviewArgs {
    #[command(subcommand)]
    pub command: ReviewSubcommand,
}

#[derive(Subcommand)]
pub enum ReviewSubcommand {
    /// Create this year's review folders, agenda and valuation
    Create(ReviewCreateArgs),
}

#[derive(Args)]
pub struct ReviewCreateArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CommsArgs {
    #[command(subcommand)]
    pub command: CommsSubcommand,
}

#[derive(Subcommand)]
pub enum CommsSubcommand {
    /// Log a communication
    Add(CommsAddArgs),
    /// List a client's communications, newest first
    List(ClientRefOutputArgs),
    /// Print the body of a logged communication
    Show(CommsShowArgs),
}

#[derive(Args)]
pub struct CommsAddArgs {
    /// Client folder ID or exact display name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// email, phone, meeting, letter or note
    #[arg(long)]
    pub kind: String,

    #[arg(long)]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub body: String,

    /// Date of the communication (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CommsShowArgs {
    #[arg(value_name = "FILE_ID")]
    pub file_id: String,
}

#[derive(Args)]
pub struct OptionsArgs {
    #[command(subcommand)]
    pub command: OptionsSubcommand,
}

#[derive(Subcommand)]
pub enum OptionsSubcommand {
    /// Show remembered option lists
    List(OptionsListArgs),
    /// Add a value to a remembered list
    Remember(OptionsRememberArgs),
}

#[derive(Args)]
pub struct OptionsListArgs {
    /// task_types, priorities or providers (all when omitted)
    #[arg(value_name = "LIST")]
    pub list: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct OptionsRememberArgs {
    /// task_types, priorities or providers
    #[arg(value_name = "LIST")]
    pub list: String,

    #[arg(value_name = "VALUE")]
    pub value: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the root folder layout
    Init(InitArgs),

    /// Manage client folders
    Clients(ClientsArgs),

    /// Manage the task ledger
    Tasks(TasksArgs),

    /// Manage a client's portfolio profile
    Portfolio(PortfolioArgs),

    /// Build annual review packs
    Review(ReviewArgs),

    /// Client communication log
    Comms(CommsArgs),

    /// Remembered option lists
    Options(OptionsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_add() {
        let cli = Cli::try_parse_from([
            "wealthpro",
            "tasks",
            "add",
            "Doe, Jane",
            "--title",
            "Review",
            "--due",
            "2025-01-01",
            "--type",
            "Annual Review",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Tasks(TasksArgs {
                command: TasksSubcommand::Add(args),
            })) => {
                assert_eq!(args.client, "Doe, Jane");
                assert_eq!(args.task_type.as_deref(), Some("Annual Review"));
            }
            _ => panic!("expected tasks add"),
        }
    }
}
