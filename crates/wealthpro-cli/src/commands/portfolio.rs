use serde_json::json;
use wealthpro_core::portfolio::{Category, ItemPatch, PortfolioItem, PortfolioStore};
use wealthpro_core::settings::OptionList;

use crate::app::{require_client, AppContext};
use crate::cli::{
    ClientRefOutputArgs, PortfolioAddArgs, PortfolioEditArgs, PortfolioItemArgs,
    PortfolioNotesArgs,
};
use crate::errors::CliError;
use crate::helpers::parse_date_flag;
use crate::output::{print_json, print_portfolio};
use crate::ui::{format_amount, print, receipt};

fn item_not_found(category: Category, item_id: &str, client: &str) -> anyhow::Error {
    CliError::not_found(
        format!("No {} with ID '{}' for {}", category, item_id, client),
        format!("Run `wealthpro portfolio show \"{}\"` to see item IDs.", client),
    )
    .into()
}

pub fn handle_show(ctx: &AppContext, args: &ClientRefOutputArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    let profile = PortfolioStore::new(drive).read(&client.id)?;

    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        return print_json(&profile);
    }
    print_portfolio(&ui, &client, &profile);
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &PortfolioAddArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    if args.name.trim().is_empty() {
        return Err(CliError::invalid_input("Item name cannot be empty").into());
    }
    let as_of = match &args.as_of {
        Some(value) => parse_date_flag("--as-of", value)?,
        None => wealthpro_core::today(),
    };

    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;

    let reference = args.reference.clone();
    let item = PortfolioItem {
        name: args.name.trim().to_string(),
        provider: args.provider.clone().unwrap_or_default(),
        account_number: match category {
            Category::Investment => reference.clone(),
            Category::Pension => None,
        },
        plan_number: match category {
            Category::Pension => reference,
            Category::Investment => None,
        },
        value: json!(args.value.unwrap_or(0.0)),
        currency: args.currency.clone(),
        as_of: wealthpro_core::format_date(as_of),
        notes: args.notes.clone().unwrap_or_default(),
        ..PortfolioItem::default()
    };
    let item = PortfolioStore::new(drive).add_item(&client.id, category, item)?;
    ctx.remember_option(OptionList::Providers, &item.provider);

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        return print_json(&item);
    }
    if !ctx.quiet() {
        let amount = format_amount(item.amount());
        print(
            &ui,
            &receipt(
                &ui,
                "Portfolio item added",
                &[
                    ("ID", item.id.as_str()),
                    ("Category", category.as_str()),
                    ("Name", item.name.as_str()),
                    ("Value", amount.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &PortfolioEditArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    let as_of = match &args.as_of {
        Some(value) => Some(wealthpro_core::format_date(parse_date_flag("--as-of", value)?)),
        None => None,
    };
    let patch = ItemPatch {
        name: args.name.clone(),
        provider: args.provider.clone(),
        reference: args.reference.clone(),
        value: args.value.map(|value| json!(value)),
        currency: args.currency.clone(),
        as_of,
        notes: args.notes.clone(),
        holdings: None,
    };

    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    if !PortfolioStore::new(drive).edit_item(&client.id, category, &args.item_id, patch)? {
        return Err(item_not_found(category, &args.item_id, &client.display_name));
    }
    if let Some(provider) = &args.provider {
        ctx.remember_option(OptionList::Providers, provider);
    }

    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        print(
            &ui,
            &receipt(
                &ui,
                "Portfolio item updated",
                &[("ID", args.item_id.as_str()), ("Category", category.as_str())],
            ),
        );
    }
    Ok(())
}

pub fn handle_remove(ctx: &AppContext, args: &PortfolioItemArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    if !PortfolioStore::new(drive).delete_item(&client.id, category, &args.item_id)? {
        return Err(item_not_found(category, &args.item_id, &client.display_name));
    }

    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        print(
            &ui,
            &receipt(
                &ui,
                "Portfolio item removed",
                &[("ID", args.item_id.as_str()), ("Category", category.as_str())],
            ),
        );
    }
    Ok(())
}

pub fn handle_notes(ctx: &AppContext, args: &PortfolioNotesArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    let profile = PortfolioStore::new(drive).save_notes(&client.id, &args.text)?;

    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        let total = format_amount(profile.computed_total);
        print(
            &ui,
            &receipt(
                &ui,
                "Portfolio notes saved",
                &[("Client", client.display_name.as_str()), ("Total", total.as_str())],
            ),
        );
    }
    Ok(())
}
