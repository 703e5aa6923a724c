//! WealthPro CLI - client records, tasks and review packs for financial advisers
//!
//! Thin command-line front end over `wealthpro-core`. Every command resolves
//! the drive backend, bootstraps the root layout and calls one core operation.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{
    Cli, ClientsSubcommand, Commands, CommsSubcommand, OptionsSubcommand, PortfolioSubcommand,
    ReviewSubcommand, TasksSubcommand,
};
use crate::commands::{clients, comms, init, misc, options, portfolio, review, tasks};
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let _ = dotenvy::dotenv();
    logging::init();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        tracing::debug!(error = ?e, "command failed");
        let ui_ctx = ctx.ui_context(false, None);
        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.split_once("\nHint: ") {
        Some((message, hint)) => (message, Some(hint)),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Clients(args)) => match &args.command {
            ClientsSubcommand::List(list_args) => clients::handle_list(ctx, list_args)?,
            ClientsSubcommand::Add(add_args) => clients::handle_add(ctx, add_args)?,
            ClientsSubcommand::Show(show_args) => clients::handle_show(ctx, show_args)?,
            ClientsSubcommand::Archive(ref_args) => clients::handle_archive(ctx, ref_args)?,
            ClientsSubcommand::Restore(ref_args) => clients::handle_restore(ctx, ref_args)?,
            ClientsSubcommand::Delete(delete_args) => clients::handle_delete(ctx, delete_args)?,
        },
        Some(Commands::Tasks(args)) => match &args.command {
            TasksSubcommand::Add(add_args) => tasks::handle_add(ctx, add_args)?,
            TasksSubcommand::List(list_args) => tasks::handle_list(ctx, list_args)?,
            TasksSubcommand::Upcoming(upcoming_args) => tasks::handle_upcoming(ctx, upcoming_args)?,
            TasksSubcommand::Show(show_args) => tasks::handle_show(ctx, show_args)?,
            TasksSubcommand::Complete(id_args) => tasks::handle_complete(ctx, id_args)?,
        },
        Some(Commands::Portfolio(args)) => match &args.command {
            PortfolioSubcommand::Show(show_args) => portfolio::handle_show(ctx, show_args)?,
            PortfolioSubcommand::Add(add_args) => portfolio::handle_add(ctx, add_args)?,
            PortfolioSubcommand::Edit(edit_args) => portfolio::handle_edit(ctx, edit_args)?,
            PortfolioSubcommand::Remove(item_args) => portfolio::handle_remove(ctx, item_args)?,
            PortfolioSubcommand::Notes(notes_args) => portfolio::handle_notes(ctx, notes_args)?,
        },
        Some(Commands::Review(args)) => match &args.command {
            ReviewSubcommand::Create(create_args) => review::handle_create(ctx, create_args)?,
        },
        Some(Commands::Comms(args)) => match &args.command {
            CommsSubcommand::Add(add_args) => comms::handle_add(ctx, add_args)?,
            CommsSubcommand::List(list_args) => comms::handle_list(ctx, list_args)?,
            CommsSubcommand::Show(show_args) => comms::handle_show(ctx, show_args)?,
        },
        Some(Commands::Options(args)) => match &args.command {
            OptionsSubcommand::List(list_args) => options::handle_list(ctx, list_args)?,
            OptionsSubcommand::Remember(remember_args) => {
                options::handle_remember(ctx, remember_args)?
            }
        },
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => misc::print_quickstart(ctx),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        assert_eq!(
            split_hint("Client 'x' not found\nHint: Run it"),
            ("Client 'x' not found", Some("Run it"))
        );
        assert_eq!(split_hint("plain failure"), ("plain failure", None));
    }
}
