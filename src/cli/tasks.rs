//! Task subcommands

use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::TaskStore;
use crate::task::{NewTask, Priority, Status, Task, TaskFilter};

use super::prompt_line;

/// 打印任务卡片
pub fn print_task(task: &Task) {
    println!();
    println!("  ID       : {}", task.id);
    println!("  Title    : {}", task.title);
    println!("  Subject  : {}", dash_if_empty(&task.subject));
    println!("  Priority : {}", task.priority.as_str());
    println!("  Status   : {}", task.status.as_str());
    println!("  Due Date : {}", task.due_date.as_deref().unwrap_or("—"));
    println!("  Notes    : {}", dash_if_empty(&task.description));
    println!("  Created  : {}", task.created_at.to_rfc3339());
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

/// satchel add
pub fn add(
    store: &TaskStore,
    title: String,
    subject: String,
    notes: String,
    due: Option<String>,
    priority: Option<String>,
) -> Result<()> {
    let task = store.create(NewTask {
        title,
        description: notes,
        subject,
        due_date: due,
        priority,
    })?;
    println!("Created task {}", task.id);
    print_task(&task);
    Ok(())
}

/// satchel list
pub fn list(store: &TaskStore) -> Result<()> {
    let tasks = store.list()?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    for task in &tasks {
        print_task(task);
    }
    Ok(())
}

/// satchel filter
pub fn filter(
    store: &TaskStore,
    status: Option<String>,
    priority: Option<String>,
    subject: Option<String>,
) -> Result<()> {
    let tasks = store.filter(&TaskFilter {
        status,
        priority,
        subject,
    })?;
    if tasks.is_empty() {
        println!("No tasks match your filter.");
        return Ok(());
    }
    for task in &tasks {
        print_task(task);
    }
    Ok(())
}

/// satchel update
#[allow(clippy::too_many_arguments)]
pub fn update(
    store: &TaskStore,
    id: &str,
    title: Option<String>,
    notes: Option<String>,
    subject: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let fields = build_update_fields(title, notes, subject, due, clear_due, priority, status);
    if fields.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }
    let task = store.update(id, &fields)?;
    println!("Updated task {}", task.id);
    print_task(&task);
    Ok(())
}

/// 把命令行参数拼成引擎的字段补丁
fn build_update_fields(
    title: Option<String>,
    notes: Option<String>,
    subject: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<String>,
    status: Option<String>,
) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(title) = title {
        fields.insert("title".to_string(), Value::String(title));
    }
    if let Some(notes) = notes {
        fields.insert("description".to_string(), Value::String(notes));
    }
    if let Some(subject) = subject {
        fields.insert("subject".to_string(), Value::String(subject));
    }
    if clear_due {
        fields.insert("due_date".to_string(), Value::Null);
    } else if let Some(due) = due {
        fields.insert("due_date".to_string(), Value::String(due));
    }
    if let Some(priority) = priority {
        fields.insert("priority".to_string(), Value::String(priority));
    }
    if let Some(status) = status {
        fields.insert("status".to_string(), Value::String(status));
    }
    fields
}

/// satchel delete
pub fn delete(store: &TaskStore, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirm = prompt_line(&format!("Delete task '{}'? [y/N]: ", id))?;
        if !confirm.eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }
    if store.delete(id)? {
        println!("Task deleted.");
    } else {
        println!("Task not found.");
    }
    Ok(())
}

/// satchel upcoming
pub fn upcoming(store: &TaskStore, days: u32) -> Result<()> {
    let tasks = store.upcoming(days)?;
    if tasks.is_empty() {
        println!("No upcoming tasks in the next {} days.", days);
        return Ok(());
    }
    for task in &tasks {
        print_task(task);
    }
    Ok(())
}

/// satchel summary
pub fn summary(store: &TaskStore) -> Result<()> {
    let summary = store.summary()?;

    let by_status = Status::ALL
        .iter()
        .map(|s| format!("{}={}", s.as_str(), summary.by_status[s.as_str()]))
        .collect::<Vec<_>>()
        .join(", ");
    let by_priority = Priority::ALL
        .iter()
        .map(|p| format!("{}={}", p.as_str(), summary.by_priority[p.as_str()]))
        .collect::<Vec<_>>()
        .join(", ");

    println!("Total tasks : {}", summary.total);
    println!("By status   : {}", by_status);
    println!("By priority : {}", by_priority);
    Ok(())
}
