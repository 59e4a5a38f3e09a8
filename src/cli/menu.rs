//! 交互式菜单（不带子命令启动时的默认入口）

use serde_json::{Map, Value};

use crate::store::{TaskStore, DEFAULT_UPCOMING_DAYS};
use crate::task::{NewTask, Priority, Status, TaskFilter};

use super::prompt_line;
use super::tasks::print_task;

const MENU: &str = "
╔══════════════════════════════════╗
║        Satchel — Tasks 📚        ║
╠══════════════════════════════════╣
║  1. Add task                     ║
║  2. List all tasks               ║
║  3. Filter tasks                 ║
║  4. Update task                  ║
║  5. Delete task                  ║
║  6. Upcoming (next 7 days)       ║
║  7. Summary                      ║
║  0. Exit                         ║
╚══════════════════════════════════╝
";

/// 菜单主循环；stdin 关闭时退出
pub fn execute(store: &TaskStore) {
    loop {
        println!("{}", MENU);
        let Ok(choice) = prompt_line("Choose an option: ") else {
            break;
        };
        match choice.as_str() {
            "0" => {
                println!("Goodbye! Stay on top of your studies!");
                break;
            }
            "1" => add(store),
            "2" => list(store),
            "3" => filter(store),
            "4" => update(store),
            "5" => delete(store),
            "6" => upcoming(store),
            "7" => summary(store),
            _ => println!("  Invalid option. Please try again."),
        }
    }
}

fn add(store: &TaskStore) {
    println!("\n── Add New Task ──");
    let Ok(title) = prompt_line("Title: ") else { return };
    let Ok(subject) = prompt_line("Subject (e.g. Math, History): ") else {
        return;
    };
    let Ok(notes) = prompt_line("Notes/Description: ") else {
        return;
    };
    let Ok(due) = prompt_line("Due date (YYYY-MM-DD or leave blank): ") else {
        return;
    };
    let Ok(priority) = prompt_line("Priority [low/medium/high] (default: medium): ") else {
        return;
    };

    let new = NewTask {
        title,
        description: notes,
        subject,
        due_date: (!due.is_empty()).then_some(due),
        priority: (!priority.is_empty()).then_some(priority),
    };
    match store.create(new) {
        Ok(task) => println!("\n✅ Task created! ID: {}", task.id),
        Err(e) => println!("\n❌ Error: {}", e),
    }
}

fn list(store: &TaskStore) {
    println!("\n── All Tasks ──");
    match store.list() {
        Ok(tasks) if tasks.is_empty() => println!("  No tasks found."),
        Ok(tasks) => {
            for task in &tasks {
                print_task(task);
            }
        }
        Err(e) => println!("❌ Error: {}", e),
    }
}

fn filter(store: &TaskStore) {
    println!("\n── Filter Tasks ──");
    let Ok(status) = prompt_line("Filter by status [pending/in-progress/completed] (leave blank to skip): ")
    else {
        return;
    };
    let Ok(priority) = prompt_line("Filter by priority [low/medium/high] (leave blank to skip): ")
    else {
        return;
    };
    let Ok(subject) = prompt_line("Filter by subject keyword (leave blank to skip): ") else {
        return;
    };

    // 空串在引擎里按"未提供"处理
    let filter = TaskFilter {
        status: Some(status),
        priority: Some(priority),
        subject: Some(subject),
    };
    match store.filter(&filter) {
        Ok(tasks) if tasks.is_empty() => println!("  No tasks match your filter."),
        Ok(tasks) => {
            for task in &tasks {
                print_task(task);
            }
        }
        Err(e) => println!("❌ Error: {}", e),
    }
}

fn update(store: &TaskStore) {
    println!("\n── Update Task ──");
    let Ok(id) = prompt_line("Enter Task ID: ") else {
        return;
    };
    println!("Leave any field blank to keep current value.");

    let mut fields = Map::new();
    for key in ["title", "description", "due_date", "priority", "status", "subject"] {
        let Ok(value) = prompt_line(&format!("  New {}: ", key)) else {
            return;
        };
        if !value.is_empty() {
            fields.insert(key.to_string(), Value::String(value));
        }
    }

    if fields.is_empty() {
        println!("  No changes made.");
        return;
    }
    match store.update(&id, &fields) {
        Ok(task) => {
            println!("\n✅ Task updated!");
            print_task(&task);
        }
        Err(e) => println!("\n❌ Error: {}", e),
    }
}

fn delete(store: &TaskStore) {
    println!("\n── Delete Task ──");
    let Ok(id) = prompt_line("Enter Task ID to delete: ") else {
        return;
    };
    let Ok(confirm) = prompt_line(&format!("Are you sure you want to delete task '{}'? [y/N]: ", id))
    else {
        return;
    };
    if !confirm.eq_ignore_ascii_case("y") {
        println!("  Cancelled.");
        return;
    }
    match store.delete(&id) {
        Ok(true) => println!("✅ Task deleted."),
        Ok(false) => println!("❌ Task not found."),
        Err(e) => println!("❌ Error: {}", e),
    }
}

fn upcoming(store: &TaskStore) {
    println!("\n── Upcoming Tasks (next {} days) ──", DEFAULT_UPCOMING_DAYS);
    match store.upcoming(DEFAULT_UPCOMING_DAYS) {
        Ok(tasks) if tasks.is_empty() => {
            println!(
                "  No upcoming tasks in the next {} days.",
                DEFAULT_UPCOMING_DAYS
            );
        }
        Ok(tasks) => {
            for task in &tasks {
                print_task(task);
            }
        }
        Err(e) => println!("❌ Error: {}", e),
    }
}

fn summary(store: &TaskStore) {
    println!("\n── Task Summary ──");
    match store.summary() {
        Ok(summary) => {
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
            println!("  Total tasks : {}", summary.total);
            println!("  By status   : {}", by_status);
            println!("  By priority : {}", by_priority);
        }
        Err(e) => println!("❌ Error: {}", e),
    }
}
