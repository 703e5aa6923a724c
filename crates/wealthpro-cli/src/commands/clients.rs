use wealthpro_core::clients::{ClientDirectory, ClientStatus, NewClient};
use wealthpro_core::names::canonical_display_name;

use crate::app::{require_client, AppContext};
use crate::cli::{ClientAddArgs, ClientDeleteArgs, ClientListArgs, ClientRefArgs, ClientRefOutputArgs};
use crate::errors::CliError;
use crate::output::{client_summary_json, print_client, print_client_list, print_json};
use crate::ui::{print, receipt, unchanged};

pub fn handle_list(ctx: &AppContext, args: &ClientListArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let layout = ctx.layout()?;
    let mut clients = ClientDirectory::new(drive, layout).list_all()?;
    if args.active {
        clients.retain(|c| c.status == ClientStatus::Active);
    } else if args.archived {
        clients.retain(|c| c.status == ClientStatus::Archived);
    }

    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        let values: Vec<serde_json::Value> = clients.iter().map(client_summary_json).collect();
        return print_json(&values);
    }
    print_client_list(&ui, &clients);
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &ClientAddArgs) -> anyhow::Result<()> {
    let first = args.first.as_deref().unwrap_or("");
    let last = args.last.as_deref().unwrap_or("");
    let display_name = canonical_display_name(first, last, args.display_name.as_deref().unwrap_or(""));
    if display_name.is_empty() {
        return Err(CliError::invalid_input(
            "A client name is required (NAME or --first and --last)",
        )
        .into());
    }

    let mut client = NewClient::new(display_name).with_names(first, last);
    if let Some(email) = &args.email {
        client = client.with_email(email.as_str());
    }
    if let Some(phone) = &args.phone {
        client = client.with_phone(phone.as_str());
    }

    let record = ClientDirectory::new(ctx.drive()?, ctx.layout()?).create_client(&client)?;

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        return print_json(&record);
    }
    if !ctx.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Client created",
                &[
                    ("ID", record.id.as_str()),
                    ("Name", record.display_name.as_str()),
                    ("Status", record.status.as_str()),
                    ("Created", record.created_at.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ClientRefOutputArgs) -> anyhow::Result<()> {
    let client = require_client(ctx.drive()?, ctx.layout()?, &args.client)?;
    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        return print_json(&client);
    }
    print_client(&ui, &client);
    Ok(())
}

pub fn handle_archive(ctx: &AppContext, args: &ClientRefArgs) -> anyhow::Result<()> {
    move_client(ctx, args, ClientStatus::Archived)
}

pub fn handle_restore(ctx: &AppContext, args: &ClientRefArgs) -> anyhow::Result<()> {
    move_client(ctx, args, ClientStatus::Active)
}

fn move_client(ctx: &AppContext, args: &ClientRefArgs, target: ClientStatus) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let layout = ctx.layout()?;
    let client = require_client(drive, layout, &args.client)?;
    let directory = ClientDirectory::new(drive, layout);
    let moved = match target {
        ClientStatus::Archived => directory.archive(&client.display_name)?,
        ClientStatus::Active => directory.restore(&client.display_name)?,
    };

    if ctx.quiet() {
        return Ok(());
    }
    let ui = ctx.ui_context(false, None);
    if !moved {
        let message = format!("{} is already {}", client.display_name, target.as_str().to_lowercase());
        print(&ui, &unchanged(&ui, &message));
        return Ok(());
    }
    let title = match target {
        ClientStatus::Archived => "Client archived",
        ClientStatus::Active => "Client restored",
    };
    print(
        &ui,
        &receipt(
            &ui,
            title,
            &[("ID", client.id.as_str()), ("Name", client.display_name.as_str())],
        ),
    );
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &ClientDeleteArgs) -> anyhow::Result<()> {
    if !args.yes {
        return Err(CliError::invalid_input(format!(
            "Refusing to delete '{}' without --yes",
            args.client
        ))
        .into());
    }
    let drive = ctx.drive()?;
    let layout = ctx.layout()?;
    let client = require_client(drive, layout, &args.client)?;
    if !ClientDirectory::new(drive, layout).delete(&client.id) {
        anyhow::bail!("Failed to delete client '{}'", client.display_name);
    }

    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        print(
            &ui,
            &receipt(
                &ui,
                "Client deleted",
                &[("ID", client.id.as_str()), ("Name", client.display_name.as_str())],
            ),
        );
    }
    Ok(())
}
