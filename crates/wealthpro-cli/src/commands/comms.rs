use wealthpro_core::communications::{CommunicationKind, CommunicationLog, NewCommunication};

use crate::app::{require_client, AppContext};
use crate::cli::{ClientRefOutputArgs, CommsAddArgs, CommsShowArgs};
use crate::helpers::parse_date_flag;
use crate::output::print_json;
use crate::ui::{blank_line, header, hint, or_dash, print, receipt, simple_table, truncate, Column};

pub fn handle_add(ctx: &AppContext, args: &CommsAddArgs) -> anyhow::Result<()> {
    let kind: CommunicationKind = args.kind.parse()?;
    let date = match &args.date {
        Some(value) => Some(parse_date_flag("--date", value)?),
        None => None,
    };

    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    let record = CommunicationLog::new(drive).record(
        &client.id,
        NewCommunication {
            kind,
            subject: args.subject.clone(),
            body: args.body.clone(),
            date,
        },
    )?;

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        return print_json(&record);
    }
    if !ctx.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Communication logged",
                &[
                    ("ID", record.file_id.as_str()),
                    ("File", record.file_name.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ClientRefOutputArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let client = require_client(drive, ctx.layout()?, &args.client)?;
    let records = CommunicationLog::new(drive).list(&client.id)?;

    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        return print_json(&records);
    }
    if records.is_empty() {
        if ui.mode.is_pretty() {
            println!("{}", header(&ui, "comms list", Some(&client.display_name)));
            println!(
                "{}",
                hint(&ui, "wealthpro comms add <CLIENT> --kind email --subject \"...\"")
            );
        } else {
            println!("count=0");
        }
        return Ok(());
    }

    if ui.mode.is_pretty() {
        println!("{}", header(&ui, "comms list", Some(&client.display_name)));
        blank_line(&ui);
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                vec![
                    or_dash(&r.date),
                    r.kind.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string()),
                    truncate(&r.subject, 48),
                    r.file_id.clone(),
                ]
            })
            .collect();
        let columns = [
            Column::new("Date"),
            Column::new("Kind"),
            Column::new("Subject"),
            Column::new("ID"),
        ];
        println!("{}", simple_table(&ui, &columns, &rows));
        blank_line(&ui);
        println!("{}", hint(&ui, "wealthpro comms show <ID>"));
    } else {
        for r in &records {
            println!(
                "{} {} {} {}",
                r.file_id,
                or_dash(&r.date),
                r.kind.map(|k| k.as_str().to_lowercase()).unwrap_or_else(|| "-".to_string()),
                r.subject
            );
        }
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &CommsShowArgs) -> anyhow::Result<()> {
    let body = CommunicationLog::new(ctx.drive()?).read(&args.file_id)?;
    print!("{}", body);
    if !body.ends_with('\n') && !body.is_empty() {
        println!();
    }
    Ok(())
}
