//! Study assistant subcommands

use crate::ai::{Assistant, ChatTurn};
use crate::error::{Result, SatchelError};
use crate::store::TaskStore;
use crate::task::Task;

use super::prompt_line;

/// satchel chat [MESSAGE]
///
/// With a message: one request, print the reply. Without: a small REPL that
/// keeps the conversation history in memory for the session.
pub fn execute(store: &TaskStore, assistant: &Assistant, message: Option<String>) -> Result<()> {
    match message {
        Some(message) => one_shot(store, assistant, &message),
        None => repl(store, assistant),
    }
}

fn one_shot(store: &TaskStore, assistant: &Assistant, message: &str) -> Result<()> {
    let tasks = store.list()?;
    let reply = assistant.chat(message, &tasks, &[])?;
    println!("{}", reply);
    Ok(())
}

fn repl(store: &TaskStore, assistant: &Assistant) -> Result<()> {
    println!("Study assistant ready. Type 'exit' to leave.");

    let mut history: Vec<ChatTurn> = Vec::new();
    loop {
        let Ok(line) = prompt_line("you> ") else { break };
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        // 每轮都带上最新的任务列表
        let tasks = store.list()?;
        match assistant.chat(&line, &tasks, &history) {
            Ok(reply) => {
                println!("\n{}\n", reply);
                history.push(ChatTurn::user(line));
                history.push(ChatTurn::assistant(reply));
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

/// satchel suggest <ID>
pub fn suggest(store: &TaskStore, assistant: &Assistant, id: &str) -> Result<()> {
    let task = find_task(store, id)?;
    let priority = assistant.suggest_priority(&task);
    println!(
        "Suggested priority for '{}': {}",
        task.title,
        priority.as_str()
    );
    Ok(())
}

/// satchel subtasks <ID>
pub fn subtasks(store: &TaskStore, assistant: &Assistant, id: &str) -> Result<()> {
    let task = find_task(store, id)?;
    let subtasks = assistant.generate_subtasks(&task);
    if subtasks.is_empty() {
        println!("No subtasks suggested. Check your API key and try again.");
        return Ok(());
    }

    println!("Subtasks for '{}':", task.title);
    for (i, subtask) in subtasks.iter().enumerate() {
        println!("  {}. {}", i + 1, subtask);
    }
    Ok(())
}

fn find_task(store: &TaskStore, id: &str) -> Result<Task> {
    store
        .get(id)?
        .ok_or_else(|| SatchelError::not_found(format!("Task with id '{}' not found.", id)))
}
