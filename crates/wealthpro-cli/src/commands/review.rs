use wealthpro_core::review_pack::ReviewPackBuilder;

use crate::app::{require_client, AppContext};
use crate::cli::ReviewCreateArgs;
use crate::output::print_json;
use crate::ui::{print, receipt};

pub fn handle_create(ctx: &AppContext, args: &ReviewCreateArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    let pack = ReviewPackBuilder::new(drive).create_pack(&client)?;

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        return print_json(&pack);
    }
    if !ctx.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Review pack created",
                &[
                    ("Client", client.display_name.as_str()),
                    ("Year folder", pack.year_folder_id.as_str()),
                    ("Agenda", pack.agenda_file_id.as_str()),
                    ("Valuation", pack.valuation_file_id.as_str()),
                ],
            ),
        );
    }
    Ok(())
}
