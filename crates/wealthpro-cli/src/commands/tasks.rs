use std::collections::HashMap;

use wealthpro_core::clients::ClientDirectory;
use wealthpro_core::settings::OptionList;
use wealthpro_core::tasks::{DriveTaskMirror, NewTask, TaskLedger};
use wealthpro_core::DriveClient;

use crate::app::{require_client, AppContext};
use crate::cli::{TaskAddArgs, TaskIdArgs, TaskListArgs, TaskShowArgs, TaskUpcomingArgs};
use crate::errors::CliError;
use crate::helpers::{normalize_due_date, require_days};
use crate::output::{client_name_map, print_json, print_task, print_task_list, task_json, tasks_json};
use crate::ui::{print, receipt};

const TASK_LIST_HINT: &str = "Run `wealthpro tasks list` to see task IDs.";

/// Ledger with the Drive stub mirror attached.
fn open_ledger<'a>(ctx: &'a AppContext) -> anyhow::Result<TaskLedger<'a, dyn DriveClient + 'a>> {
    let drive = ctx.drive()?;
    let ledger = TaskLedger::open(drive, ctx.layout()?)?;
    Ok(ledger.with_mirror(DriveTaskMirror::new(drive)))
}

fn task_not_found(task_id: &str) -> anyhow::Error {
    CliError::not_found(format!("Task '{}' not found", task_id), TASK_LIST_HINT).into()
}

pub fn handle_add(ctx: &AppContext, args: &TaskAddArgs) -> anyhow::Result<()> {
    if args.title.trim().is_empty() {
        return Err(CliError::invalid_input("Task title cannot be empty").into());
    }
    let due_date = normalize_due_date(args.due.as_deref().unwrap_or(""))?;
    let client = require_client(ctx.drive()?, ctx.layout()?, &args.client)?;

    let task_id = args
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let mut task = NewTask::new(task_id, client.id.as_str(), args.title.as_str()).with_due_date(due_date);
    if let Some(task_type) = &args.task_type {
        task = task.with_type(task_type.as_str());
    }
    if let Some(priority) = &args.priority {
        task = task.with_priority(priority.as_str());
    }
    if let Some(description) = &args.description {
        task = task.with_description(description.as_str());
    }
    if let Some(status) = &args.status {
        task = task.with_status(status.as_str());
    }

    let record = open_ledger(ctx)?.append(task, Some(&client))?;
    ctx.remember_option(OptionList::TaskTypes, &record.task_type);
    ctx.remember_option(OptionList::Priorities, &record.priority);

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        return print_json(&record);
    }
    if !ctx.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Task added",
                &[
                    ("ID", record.task_id.as_str()),
                    ("Client", client.display_name.as_str()),
                    ("Title", record.title.as_str()),
                    ("Due", record.due_date.as_str()),
                    ("Status", record.status.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &TaskListArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let layout = ctx.layout()?;
    let ledger = TaskLedger::open(drive, layout)?;
    let (tasks, context) = match &args.client {
        Some(reference) => {
            let client = require_client(drive, layout, reference)?;
            (ledger.for_client(&client.id)?, Some(client.display_name))
        }
        None => (ledger.list_all()?, None),
    };
    let names = client_name_map(drive, layout)?;

    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        return print_json(&tasks_json(&tasks, &names));
    }
    print_task_list(
        &ui,
        "tasks list",
        context.as_deref(),
        &tasks,
        &names,
        wealthpro_core::today(),
    );
    Ok(())
}

pub fn handle_upcoming(ctx: &AppContext, args: &TaskUpcomingArgs) -> anyhow::Result<()> {
    let days = require_days(match args.days {
        Some(days) => days,
        None => ctx.settings()?.upcoming_days,
    })?;
    let drive = ctx.drive()?;
    let layout = ctx.layout()?;
    let tasks = TaskLedger::open(drive, layout)?.upcoming(days)?;
    let names = client_name_map(drive, layout)?;

    let ui = ctx.ui_context(args.output.json, args.output.format.as_deref());
    if ui.mode.is_json() {
        return print_json(&tasks_json(&tasks, &names));
    }
    let context = format!("next {} days", days);
    print_task_list(
        &ui,
        "tasks upcoming",
        Some(&context),
        &tasks,
        &names,
        wealthpro_core::today(),
    );
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &TaskShowArgs) -> anyhow::Result<()> {
    let drive = ctx.drive()?;
    let layout = ctx.layout()?;
    let task = TaskLedger::open(drive, layout)?
        .get(&args.task_id)?
        .ok_or_else(|| task_not_found(&args.task_id))?;
    let client_name = ClientDirectory::new(drive, layout)
        .get(&task.client_id)?
        .map(|client| client.display_name);

    let ui = ctx.ui_context(args.json, None);
    if ui.mode.is_json() {
        let names: HashMap<String, String> = client_name
            .iter()
            .map(|name| (task.client_id.clone(), name.clone()))
            .collect();
        return print_json(&task_json(&task, &names));
    }
    print_task(&ui, &task, client_name.as_deref());
    Ok(())
}

pub fn handle_complete(ctx: &AppContext, args: &TaskIdArgs) -> anyhow::Result<()> {
    if !open_ledger(ctx)?.complete(&args.task_id)? {
        return Err(task_not_found(&args.task_id));
    }
    if !ctx.quiet() {
        let ui = ctx.ui_context(false, None);
        let completed = wealthpro_core::format_date(wealthpro_core::today());
        print(
            &ui,
            &receipt(
                &ui,
                "Task completed",
                &[("ID", args.task_id.as_str()), ("Completed", completed.as_str())],
            ),
        );
    }
    Ok(())
}
