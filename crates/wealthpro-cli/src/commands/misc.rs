use clap::CommandFactory;
use clap_complete::generate;

use crate::app::{AppContext, ACCESS_TOKEN_ENV};
use crate::cli::{Cli, CompletionsArgs};
use crate::ui::theme::{styled, styles};
use crate::ui::{blank_line, header, hint};

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "wealthpro", &mut std::io::stdout());
    Ok(())
}

/// Shown when `wealthpro` runs without a command.
pub fn print_quickstart(ctx: &AppContext) {
    let ui = ctx.ui_context(false, None);
    let steps = [
        ("wealthpro init", "create a local workspace"),
        ("wealthpro clients add \"Doe, Jane\"", "add a client"),
        ("wealthpro tasks add \"Doe, Jane\" --title \"Annual review\" --due 2025-06-01", "schedule work"),
        ("wealthpro tasks upcoming", "see what is due"),
        ("wealthpro review create \"Doe, Jane\"", "build this year's review pack"),
    ];

    if !ui.mode.is_pretty() {
        for (command, _) in steps {
            println!("{}", command);
        }
        return;
    }
    println!("{}", header(&ui, "quickstart", None));
    blank_line(&ui);
    for (command, what) in steps {
        println!(
            "  {}  {}",
            styled(command, styles::bold(), ui.color),
            styled(what, styles::dim(), ui.color)
        );
    }
    blank_line(&ui);
    println!(
        "{}",
        hint(
            &ui,
            &format!(
                "Google Drive: `wealthpro init --backend google --root-folder-id <ID>` with {} set.",
                ACCESS_TOKEN_ENV
            )
        )
    );
}
