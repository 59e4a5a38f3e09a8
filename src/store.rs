//! Task engine shared by the CLI and the Web API
//!
//! This module is the business logic layer: validation, defaults and the
//! derived views all live here, so the interactive menu, the subcommands and
//! the HTTP handlers stay thin.
//!
//! ## Architecture
//!
//! ```text
//! CLI (src/cli)  ──┐
//!                  ├──> TaskStore (this module) ──> TaskStorage (src/storage/tasks.rs)
//! Web (src/api) ───┘
//! ```
//!
//! The store performs one `load` per operation and one `save` per mutation.
//! There is no locking: two processes mutating the same data file race with
//! last-writer-wins semantics. Callers that need concurrent writes must
//! serialize them externally.

use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Result, SatchelError};
use crate::storage::tasks::TaskStorage;
use crate::task::{parse_due_date, NewTask, Priority, Status, Task, TaskFilter, TaskSummary};

/// Default window for the upcoming view, in days
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

const PRIORITY_MSG: &str = "Priority must be one of low, medium, high.";
const STATUS_MSG: &str = "Status must be one of pending, in-progress, completed.";

/// The task collection engine
///
/// Owns an injected persistence backend; construct one per process (CLI run
/// or server) instead of going through a global.
pub struct TaskStore {
    storage: Box<dyn TaskStorage>,
}

/// Validated values staged by `update` before anything is applied
#[derive(Default)]
struct StagedUpdate {
    title: Option<String>,
    description: Option<String>,
    subject: Option<String>,
    /// `Some(None)` clears the due date
    due_date: Option<Option<String>>,
    priority: Option<Priority>,
    status: Option<Status>,
}

impl TaskStore {
    pub fn new(storage: Box<dyn TaskStorage>) -> Self {
        Self { storage }
    }

    /// Create a new task and persist it
    ///
    /// # Steps
    ///
    /// 1. Validate title (non-empty after trimming)
    /// 2. Validate raw priority / due date inputs
    /// 3. Build the record (fresh UUID, both timestamps = now, status pending)
    /// 4. Append and save
    ///
    /// # Returns
    ///
    /// The stored task, for the caller to display or serialize
    pub fn create(&self, new: NewTask) -> Result<Task> {
        // 1. Title
        let title = new.title.trim();
        if title.is_empty() {
            return Err(SatchelError::validation("Task title cannot be empty."));
        }

        // 2. Priority / due date
        let priority = match new.priority.as_deref() {
            None => Priority::default(),
            Some(raw) => {
                Priority::parse(raw).ok_or_else(|| SatchelError::validation(PRIORITY_MSG))?
            }
        };
        if let Some(due) = new.due_date.as_deref() {
            validate_due_date(due)?;
        }

        // 3. Build record
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: new.description.trim().to_string(),
            subject: new.subject.trim().to_string(),
            due_date: new.due_date,
            priority,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
        };

        // 4. Append + save
        let mut tasks = self.storage.load()?;
        tasks.push(task.clone());
        self.storage.save(&tasks)?;
        Ok(task)
    }

    /// Return all tasks in stored order
    pub fn list(&self) -> Result<Vec<Task>> {
        self.storage.load()
    }

    /// Return a single task by ID, or None if not found
    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.storage.load()?.into_iter().find(|t| t.id == id))
    }

    /// Update fields of an existing task
    ///
    /// # Steps
    ///
    /// 1. Load and locate the task; a missing ID is always `NotFound`,
    ///    even when the patch itself is invalid
    /// 2. Validate the whole patch against the field allow-list
    ///    (all-or-nothing: nothing is applied if any entry is bad)
    /// 3. Apply the staged values, refresh `updated_at`
    /// 4. Save
    ///
    /// An empty patch is valid: it only refreshes `updated_at`.
    pub fn update(&self, id: &str, fields: &Map<String, Value>) -> Result<Task> {
        // 1. Locate
        let mut tasks = self.storage.load()?;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SatchelError::not_found(format!("Task with id '{}' not found.", id)))?;

        // 2. Validate everything up front
        let staged = stage_update(fields)?;

        // 3. Apply
        let task = &mut tasks[idx];
        if let Some(title) = staged.title {
            task.title = title;
        }
        if let Some(description) = staged.description {
            task.description = description;
        }
        if let Some(subject) = staged.subject {
            task.subject = subject;
        }
        if let Some(due_date) = staged.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = staged.priority {
            task.priority = priority;
        }
        if let Some(status) = staged.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
        let updated = task.clone();

        // 4. Save
        self.storage.save(&tasks)?;
        Ok(updated)
    }

    /// Delete a task by ID. Returns true if deleted, false if not found
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut tasks = self.storage.load()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.storage.save(&tasks)?;
        Ok(true)
    }

    /// Filter tasks by status, priority and/or subject (AND-combined)
    ///
    /// Status and priority match the stored label exactly; an unknown value
    /// matches nothing rather than erroring. Subject is a case-insensitive
    /// substring match. Empty strings count as "no filter".
    pub fn filter(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut tasks = self.storage.load()?;
        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            tasks.retain(|t| t.status.as_str() == status);
        }
        if let Some(priority) = filter.priority.as_deref().filter(|s| !s.is_empty()) {
            tasks.retain(|t| t.priority.as_str() == priority);
        }
        if let Some(subject) = filter.subject.as_deref().filter(|s| !s.is_empty()) {
            let needle = subject.to_lowercase();
            tasks.retain(|t| t.subject.to_lowercase().contains(&needle));
        }
        Ok(tasks)
    }

    /// Return non-completed tasks due within the next `days` days
    ///
    /// The window is `[today, today + days]` on local calendar dates, both
    /// ends inclusive. Tasks without a due date are skipped, and so are
    /// stored dates that no longer parse (hand-edited data files). Results
    /// are sorted by due date, earliest first.
    pub fn upcoming(&self, days: u32) -> Result<Vec<Task>> {
        let today = Local::now().date_naive();
        let cutoff = today
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        let mut due_soon: Vec<(NaiveDate, Task)> = Vec::new();
        for task in self.storage.load()? {
            if task.status == Status::Completed {
                continue;
            }
            if let Some(due) = task.due() {
                if today <= due && due <= cutoff {
                    due_soon.push((due, task));
                }
            }
        }

        due_soon.sort_by_key(|(due, _)| *due);
        Ok(due_soon.into_iter().map(|(_, task)| task).collect())
    }

    /// Count tasks by status and by priority
    ///
    /// Every canonical label is present in the maps, zero when unused.
    pub fn summary(&self) -> Result<TaskSummary> {
        let tasks = self.storage.load()?;

        let mut by_status: BTreeMap<String, usize> = Status::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut by_priority: BTreeMap<String, usize> = Priority::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), 0))
            .collect();

        for task in &tasks {
            *by_status.entry(task.status.as_str().to_string()).or_insert(0) += 1;
            *by_priority
                .entry(task.priority.as_str().to_string())
                .or_insert(0) += 1;
        }

        Ok(TaskSummary {
            total: tasks.len(),
            by_status,
            by_priority,
        })
    }
}

/// Validate a raw patch map and stage the typed values
fn stage_update(fields: &Map<String, Value>) -> Result<StagedUpdate> {
    let mut staged = StagedUpdate::default();
    for (key, value) in fields {
        match key.as_str() {
            "title" => {
                let title = expect_string(key, value)?.trim().to_string();
                if title.is_empty() {
                    return Err(SatchelError::validation("Task title cannot be empty."));
                }
                staged.title = Some(title);
            }
            "description" => {
                staged.description = Some(expect_string(key, value)?.trim().to_string());
            }
            "subject" => {
                staged.subject = Some(expect_string(key, value)?.trim().to_string());
            }
            "due_date" => {
                staged.due_date = Some(match value {
                    Value::Null => None,
                    Value::String(s) => {
                        validate_due_date(s)?;
                        Some(s.clone())
                    }
                    other => return Err(invalid_due_date(&other.to_string())),
                });
            }
            "priority" => {
                let raw = value.as_str().unwrap_or_default();
                staged.priority = Some(
                    Priority::parse(raw).ok_or_else(|| SatchelError::validation(PRIORITY_MSG))?,
                );
            }
            "status" => {
                let raw = value.as_str().unwrap_or_default();
                staged.status =
                    Some(Status::parse(raw).ok_or_else(|| SatchelError::validation(STATUS_MSG))?);
            }
            _ => {
                return Err(SatchelError::validation(format!(
                    "Cannot update field: {}",
                    key
                )));
            }
        }
    }
    Ok(staged)
}

/// String-typed field or a validation error naming it
fn expect_string<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| SatchelError::validation(format!("Field '{}' must be a string.", key)))
}

/// Check YYYY-MM-DD syntax, keeping the raw string as stored form
fn validate_due_date(due: &str) -> Result<()> {
    if parse_due_date(due).is_none() {
        return Err(invalid_due_date(due));
    }
    Ok(())
}

fn invalid_due_date(got: &str) -> SatchelError {
    SatchelError::validation(format!(
        "due_date must be in YYYY-MM-DD format, got: '{}'",
        got
    ))
}
