//! Text and table output for records.

use std::collections::HashMap;

use chrono::NaiveDate;
use wealthpro_core::clients::{ClientDirectory, ClientRecord};
use wealthpro_core::portfolio::{PortfolioItem, PortfolioProfile};
use wealthpro_core::tasks::TaskRecord;
use wealthpro_core::{DriveClient, WorkspaceLayout};

use crate::ui::theme::OVERDUE;
use crate::ui::{
    blank_line, format_amount, header, hint, kv, or_dash, section, short_id, simple_table,
    single_line, table, truncate, Column, UiContext,
};

/// Build a map of client folder ID -> display name.
pub fn client_name_map<D: DriveClient + ?Sized>(
    drive: &D,
    layout: &WorkspaceLayout,
) -> anyhow::Result<HashMap<String, String>> {
    let clients = ClientDirectory::new(drive, layout).list_all()?;
    Ok(clients
        .into_iter()
        .map(|client| (client.id, client.display_name))
        .collect())
}

pub fn print_client_list(ui: &UiContext, clients: &[ClientRecord]) {
    if clients.is_empty() {
        if ui.mode.is_pretty() {
            println!("{}", header(ui, "clients list", None));
            println!("{}", hint(ui, "wealthpro clients add \"Surname, Firstname\""));
        } else {
            println!("count=0");
        }
        return;
    }

    if ui.mode.is_pretty() {
        println!("{}", header(ui, "clients list", None));
        blank_line(ui);
        let rows: Vec<Vec<String>> = clients
            .iter()
            .map(|c| {
                vec![
                    short_id(&c.id),
                    truncate(&c.display_name, 40),
                    c.status.to_string(),
                    or_dash(&c.created_at),
                ]
            })
            .collect();
        let columns = [
            Column::new("ID"),
            Column::new("Name"),
            Column::new("Status"),
            Column::new("Created"),
        ];
        println!("{}", simple_table(ui, &columns, &rows));
        blank_line(ui);
        println!("{}", hint(ui, &format!("{} clients", clients.len())));
    } else {
        for c in clients {
            println!("{} {} {}", c.id, c.status.as_str().to_lowercase(), c.display_name);
        }
    }
}

pub fn print_client(ui: &UiContext, client: &ClientRecord) {
    if ui.mode.is_pretty() {
        println!("{}", header(ui, "clients show", Some(&client.display_name)));
        blank_line(ui);
    }
    println!("{}", kv(ui, "ID", &client.id));
    println!("{}", kv(ui, "Name", &client.display_name));
    println!("{}", kv(ui, "First name", &or_dash(&client.first_name)));
    println!("{}", kv(ui, "Last name", &or_dash(&client.last_name)));
    println!("{}", kv(ui, "Status", client.status.as_str()));
    println!("{}", kv(ui, "Created", &or_dash(&client.created_at)));

    if client.subfolders.is_empty() {
        return;
    }
    if ui.mode.is_pretty() {
        blank_line(ui);
        println!("{}", section(ui, "Folders"));
        let rows: Vec<Vec<String>> = client
            .subfolders
            .iter()
            .map(|(name, id)| vec![name.clone(), id.clone()])
            .collect();
        println!(
            "{}",
            simple_table(ui, &[Column::new("Folder"), Column::new("ID")], &rows)
        );
    } else {
        for (name, id) in &client.subfolders {
            println!("folder={} {}", id, name);
        }
    }
}

/// Print tasks; `today` drives the overdue marker.
pub fn print_task_list(
    ui: &UiContext,
    command: &str,
    context: Option<&str>,
    tasks: &[TaskRecord],
    client_names: &HashMap<String, String>,
    today: NaiveDate,
) {
    if tasks.is_empty() {
        if ui.mode.is_pretty() {
            println!("{}", header(ui, command, context));
            println!("{}", hint(ui, "wealthpro tasks add <CLIENT> --title \"...\""));
        } else {
            println!("count=0");
        }
        return;
    }

    if ui.mode.is_pretty() {
        println!("{}", header(ui, command, context));
        blank_line(ui);
        let rows: Vec<Vec<String>> = tasks
            .iter()
            .map(|t| {
                let overdue = !t.is_completed() && t.due().is_some_and(|due| due < today);
                let marker = if overdue { OVERDUE.get(ui.unicode) } else { "" };
                vec![
                    marker.to_string(),
                    truncate(&t.task_id, 12),
                    or_dash(&t.due_date),
                    truncate(
                        client_names.get(&t.client_id).map(String::as_str).unwrap_or(&t.client_id),
                        24,
                    ),
                    truncate(&t.title, 36),
                    or_dash(&t.task_type),
                    or_dash(&t.priority),
                    or_dash(&t.status),
                ]
            })
            .collect();
        let columns = [
            Column::new(""),
            Column::new("ID"),
            Column::new("Due"),
            Column::new("Client"),
            Column::new("Title"),
            Column::new("Type"),
            Column::new("Priority"),
            Column::new("Status"),
        ];
        println!("{}", simple_table(ui, &columns, &rows));
        blank_line(ui);
        println!("{}", hint(ui, &format!("{} tasks", tasks.len())));
    } else {
        for t in tasks {
            println!(
                "{} {} {} {} {}",
                t.task_id,
                or_dash(&t.due_date),
                or_dash(&t.status).to_lowercase(),
                t.client_id,
                single_line(&t.title)
            );
        }
    }
}

pub fn print_task(ui: &UiContext, task: &TaskRecord, client_name: Option<&str>) {
    if ui.mode.is_pretty() {
        println!("{}", header(ui, "tasks show", Some(&task.task_id)));
        blank_line(ui);
    }
    println!("{}", kv(ui, "ID", &task.task_id));
    println!("{}", kv(ui, "Client", client_name.unwrap_or(&task.client_id)));
    println!("{}", kv(ui, "Title", &single_line(&task.title)));
    println!("{}", kv(ui, "Type", &or_dash(&task.task_type)));
    println!("{}", kv(ui, "Priority", &or_dash(&task.priority)));
    println!("{}", kv(ui, "Status", &or_dash(&task.status)));
    println!("{}", kv(ui, "Due", &or_dash(&task.due_date)));
    println!("{}", kv(ui, "Created", &or_dash(&task.created_date)));
    println!("{}", kv(ui, "Completed", &or_dash(&task.completed_date)));
    if !task.time_spent.is_empty() {
        println!("{}", kv(ui, "Time spent", &task.time_spent));
    }
    if !task.description.is_empty() {
        if ui.mode.is_pretty() {
            blank_line(ui);
            println!("{}", task.description);
        } else {
            println!("{}", kv(ui, "Description", &single_line(&task.description)));
        }
    }
}

fn item_rows(items: &[PortfolioItem]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| {
            vec![
                short_id(&item.id),
                truncate(&item.name, 30),
                or_dash(&item.provider),
                or_dash(item.reference()),
                format_amount(item.amount()),
                or_dash(&item.currency),
                or_dash(&item.as_of),
            ]
        })
        .collect()
}

pub fn print_portfolio(ui: &UiContext, client: &ClientRecord, profile: &PortfolioProfile) {
    if !ui.mode.is_pretty() {
        for (category, items) in [("investment", &profile.investments), ("pension", &profile.pensions)] {
            for item in items {
                println!(
                    "{} {} {:.2} {}",
                    category,
                    item.id,
                    item.amount(),
                    single_line(&item.name)
                );
            }
        }
        println!("total={:.2}", profile.computed_total);
        if !profile.notes.is_empty() {
            println!("notes={}", single_line(&profile.notes));
        }
        return;
    }

    println!("{}", header(ui, "portfolio show", Some(&client.display_name)));
    let columns = [
        Column::new("ID"),
        Column::new("Name"),
        Column::new("Provider"),
        Column::new("Reference"),
        Column::new("Value"),
        Column::new("Currency"),
        Column::new("As of"),
    ];
    for (title, items) in [("Investments", &profile.investments), ("Pensions", &profile.pensions)] {
        blank_line(ui);
        println!("{}", section(ui, title));
        if items.is_empty() {
            println!("  none recorded");
        } else {
            println!("{}", table(ui, &columns, &item_rows(items)));
        }
    }
    blank_line(ui);
    println!("{}", kv(ui, "Total", &format_amount(profile.computed_total)));
    if !profile.notes.is_empty() {
        blank_line(ui);
        println!("{}", section(ui, "Notes"));
        println!("{}", profile.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wealthpro_core::clients::NewClient;
    use wealthpro_core::drive::{SqliteDrive, ROOT_ID};

    #[test]
    fn test_client_name_map() {
        let drive = SqliteDrive::open_in_memory().unwrap();
        let layout = WorkspaceLayout::bootstrap(&drive, ROOT_ID).unwrap();
        let directory = ClientDirectory::new(&drive, &layout);
        let jane = directory.create_client(&NewClient::new("Doe, Jane")).unwrap();
        let john = directory.create_client(&NewClient::new("Smith, John")).unwrap();
        directory.archive("Smith, John").unwrap();

        let names = client_name_map(&drive, &layout).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names.get(&jane.id).map(String::as_str), Some("Doe, Jane"));
        assert_eq!(names.get(&john.id).map(String::as_str), Some("Smith, John"));
    }

    #[test]
    fn test_item_rows_format_values() {
        let item = PortfolioItem {
            id: "0123456789".to_string(),
            name: "ISA".to_string(),
            plan_number: None,
            account_number: Some("A-1".to_string()),
            value: serde_json::json!("1500.5"),
            ..PortfolioItem::default()
        };
        let rows = item_rows(&[item]);
        assert_eq!(rows[0][0], "01234567");
        assert_eq!(rows[0][3], "A-1");
        assert_eq!(rows[0][4], "1,500.50");
        assert_eq!(rows[0][5], "-");
    }
}
