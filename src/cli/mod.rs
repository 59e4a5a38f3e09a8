//! CLI 模块

pub mod chat;
pub mod menu;
pub mod tasks;
pub mod web;

use std::io::{self, Write};

use clap::{Parser, Subcommand};

use crate::ai::Assistant;
use crate::error::Result;
use crate::storage::config::load_config;
use crate::storage::tasks::JsonFileStorage;
use crate::store::{TaskStore, DEFAULT_UPCOMING_DAYS};

#[derive(Parser)]
#[command(name = "satchel")]
#[command(version)]
#[command(about = "Personal task tracker for students")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Subject (e.g. "Math", "History")
        #[arg(short, long, default_value = "")]
        subject: String,
        /// Notes / description
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
        /// Priority: low, medium or high (default: medium)
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// List all tasks
    List,
    /// Filter tasks by status, priority and/or subject
    Filter {
        /// Status: pending, in-progress or completed
        #[arg(long)]
        status: Option<String>,
        /// Priority: low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// Subject keyword (case-insensitive substring)
        #[arg(long)]
        subject: Option<String>,
    },
    /// Update fields of an existing task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New notes / description
        #[arg(long)]
        notes: Option<String>,
        /// New subject
        #[arg(long)]
        subject: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// New priority: low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// New status: pending, in-progress or completed
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show tasks due soon
    Upcoming {
        /// Window size in days
        #[arg(short, long, default_value_t = DEFAULT_UPCOMING_DAYS)]
        days: u32,
    },
    /// Show task counts by status and priority
    Summary,
    /// Chat with the study assistant (interactive when MESSAGE is omitted)
    Chat {
        /// One-shot message
        message: Option<String>,
    },
    /// Ask the assistant to suggest a priority for a task
    Suggest {
        /// Task ID
        id: String,
    },
    /// Ask the assistant to break a task into subtasks
    Subtasks {
        /// Task ID
        id: String,
    },
    /// Start the web API server
    Web {
        /// Port to listen on (default: config, then 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// 打开默认数据文件上的任务引擎
pub fn open_store() -> TaskStore {
    TaskStore::new(Box::new(JsonFileStorage::open_default()))
}

/// 按配置构建 AI 助手
pub fn open_assistant() -> Result<Assistant> {
    Assistant::from_config(&load_config())
}

/// 打印提示并读取一行（trim 后返回）；stdin 关闭时返回错误
pub(crate) fn prompt_line(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    let n = io::stdin().read_line(&mut line)?;
    if n == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}
