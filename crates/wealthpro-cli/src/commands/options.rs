use wealthpro_core::settings::{OptionList, SettingsStore};

use crate::app::AppContext;
use crate::cli::{OptionsListArgs, OptionsRememberArgs};
use crate::output::print_json;
use crate::ui::{blank_line, header, print, receipt, section, unchanged};

pub fn handle_list(ctx: &AppContext, args: &OptionsListArgs) -> anyhow::Result<()> {
    let only: Option<OptionList> = args.list.as_deref().map(str::parse::<OptionList>).transpose()?;
    let layout = ctx.layout()?;
    let lists = SettingsStore::new(ctx.drive()?, &layout.root_id).load()?;

    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        return match only {
            Some(list) => print_json(lists.values(list)),
            None => print_json(&lists),
        };
    }

    let selected: Vec<OptionList> = match only {
        Some(list) => vec![list],
        None => OptionList::ALL.to_vec(),
    };
    if ui.mode.is_pretty() {
        println!("{}", header(&ui, "options list", None));
        for list in selected {
            blank_line(&ui);
            println!("{}", section(&ui, list.as_str()));
            let values = lists.values(list);
            if values.is_empty() {
                println!("  (empty)");
            }
            for value in values {
                println!("  {}", value);
            }
        }
    } else {
        for list in selected {
            for value in lists.values(list) {
                println!("{} {}", list, value);
            }
        }
    }
    Ok(())
}

pub fn handle_remember(ctx: &AppContext, args: &OptionsRememberArgs) -> anyhow::Result<()> {
    let list: OptionList = args.list.parse()?;
    let layout = ctx.layout()?;
    let added = SettingsStore::new(ctx.drive()?, &layout.root_id).remember(list, &args.value)?;

    if ctx.quiet() {
        return Ok(());
    }
    let ui = ctx.ui_context(false, None);
    if added {
        print(
            &ui,
            &receipt(
                &ui,
                "Option remembered",
                &[("List", list.as_str()), ("Value", args.value.trim())],
            ),
        );
    } else {
        print(&ui, &unchanged(&ui, &format!("'{}' is already in {}", args.value.trim(), list)));
    }
    Ok(())
}
