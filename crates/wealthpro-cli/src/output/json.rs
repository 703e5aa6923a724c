//! JSON output for records.

use std::collections::HashMap;

use serde::Serialize;
use wealthpro_core::clients::ClientRecord;
use wealthpro_core::tasks::TaskRecord;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Client summary for list output (no subfolder map).
pub fn client_summary_json(client: &ClientRecord) -> serde_json::Value {
    serde_json::json!({
        "id": client.id,
        "display_name": client.display_name,
        "first_name": client.first_name,
        "last_name": client.last_name,
        "created_at": client.created_at,
        "status": client.status,
    })
}

/// Task with the owning client's display name attached.
pub fn task_json(task: &TaskRecord, client_names: &HashMap<String, String>) -> serde_json::Value {
    let mut value = serde_json::json!(task);
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "client_name".to_string(),
            client_names
                .get(&task.client_id)
                .map(|name| serde_json::Value::String(name.clone()))
                .unwrap_or(serde_json::Value::Null),
        );
    }
    value
}

pub fn tasks_json(
    tasks: &[TaskRecord],
    client_names: &HashMap<String, String>,
) -> Vec<serde_json::Value> {
    tasks
        .iter()
        .map(|task| task_json(task, client_names))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_json_adds_client_name() {
        let task = TaskRecord {
            task_id: "T1".to_string(),
            client_id: "c1".to_string(),
            title: "Call".to_string(),
            ..TaskRecord::default()
        };
        let mut names = HashMap::new();
        names.insert("c1".to_string(), "Doe, Jane".to_string());

        let value = task_json(&task, &names);
        assert_eq!(value["task_id"], "T1");
        assert_eq!(value["client_name"], "Doe, Jane");

        let orphan = task_json(&task, &HashMap::new());
        assert!(orphan["client_name"].is_null());
    }
}
