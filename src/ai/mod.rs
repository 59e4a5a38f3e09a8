//! AI study assistant
//!
//! A thin capability layer over a pluggable text-generation backend. The
//! assistant is stateless: every request carries the student's full task
//! list, and conversation memory is whatever history the caller passes in.
//!
//! Failure handling is deliberately uneven: `chat` surfaces provider errors
//! to the caller, while `suggest_priority` and `generate_subtasks` degrade
//! to safe defaults so a flaky network never blocks the task views built on
//! top of them.

pub mod gemini;
pub mod openai;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SatchelError};
use crate::storage::config::Config;
use crate::task::{Priority, Task};

/// How many trailing history turns ride along with each chat request
const HISTORY_WINDOW: usize = 10;

const CHAT_MAX_TOKENS: u32 = 1024;
const PRIORITY_MAX_TOKENS: u32 = 10;
const SUBTASKS_MAX_TOKENS: u32 = 300;

/// Persona sent as the system prompt with every request
const SYSTEM_PROMPT: &str = "\
You are the Satchel study assistant, built into a student task tracker.
The student's full task list rides along with every message; ground your
answers in it.

You help with:
- calling out which tasks deserve attention first
- splitting big assignments into manageable steps
- rough time estimates for upcoming work
- spotting overdue or at-risk deadlines
- practical study advice when asked

Tone: friendly, direct, a little encouraging. Students are busy, so lead
with the answer and keep replies short.";

/// Speaker of a [`ChatTurn`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Assistant,
    User,
}

// 未知角色一律按 user 处理
impl<'de> Deserialize<'de> for ChatRole {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "assistant" => ChatRole::Assistant,
            _ => ChatRole::User,
        })
    }
}

/// One turn of an assistant conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Prompt bundle handed to a provider
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub turns: &'a [ChatTurn],
    pub max_tokens: u32,
}

/// A text-generation backend
///
/// Implementations make one blocking HTTP call per request and map every
/// failure (missing credential, transport, bad payload) to
/// [`SatchelError::Service`].
pub trait Provider: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Task-aware study assistant over an injected provider
pub struct Assistant {
    provider: Box<dyn Provider>,
}

impl Assistant {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Pick the provider named by `[ai] provider` in the config
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.ai.provider.as_str() {
            "gemini" => Ok(Self::new(Box::new(gemini::GeminiProvider::from_config(
                config,
            )))),
            "openai" => Ok(Self::new(Box::new(openai::OpenAiProvider::from_config(
                config,
            )))),
            other => Err(SatchelError::validation(format!(
                "Unknown AI provider '{}'. Must be one of gemini, openai.",
                other
            ))),
        }
    }

    /// Send a chat message with the current task list as context
    ///
    /// Only the last [`HISTORY_WINDOW`] turns of `history` are forwarded.
    /// Provider failures propagate; the caller decides how to surface them.
    pub fn chat(&self, message: &str, tasks: &[Task], history: &[ChatTurn]) -> Result<String> {
        let context = format!(
            "\n\n--- STUDENT'S CURRENT TASKS ---\n{}\n---",
            serde_json::to_string_pretty(tasks)?
        );

        let start = history.len().saturating_sub(HISTORY_WINDOW);
        let mut turns = history[start..].to_vec();
        turns.push(ChatTurn::user(format!("{}{}", message, context)));

        self.provider.complete(&CompletionRequest {
            system: SYSTEM_PROMPT,
            turns: &turns,
            max_tokens: CHAT_MAX_TOKENS,
        })
    }

    /// Ask for a one-word priority call for a single task
    ///
    /// Never fails: an unusable reply or any provider error degrades to
    /// [`Priority::Medium`].
    pub fn suggest_priority(&self, task: &Task) -> Priority {
        let prompt = format!(
            "For this student task: title='{}', subject='{}', due='{}', description='{}'. \
             Reply with ONLY one word: low, medium, or high.",
            task.title,
            task.subject,
            task.due_date.as_deref().unwrap_or("no deadline"),
            task.description
        );
        let turns = [ChatTurn::user(prompt)];

        let reply = self.provider.complete(&CompletionRequest {
            system: SYSTEM_PROMPT,
            turns: &turns,
            max_tokens: PRIORITY_MAX_TOKENS,
        });
        match reply {
            Ok(word) => Priority::parse(&word.trim().to_lowercase()).unwrap_or(Priority::Medium),
            Err(_) => Priority::Medium,
        }
    }

    /// Ask to break a task into 3-5 subtasks
    ///
    /// Never fails: a malformed reply or any provider error degrades to an
    /// empty list.
    pub fn generate_subtasks(&self, task: &Task) -> Vec<String> {
        let prompt = format!(
            "Break this student task into 3-5 concrete subtasks.\n\
             Task: {}\nSubject: {}\nNotes: {}\n\
             Reply ONLY with a JSON array of short strings, no explanation, no markdown.",
            task.title, task.subject, task.description
        );
        let turns = [ChatTurn::user(prompt)];

        let reply = self.provider.complete(&CompletionRequest {
            system: SYSTEM_PROMPT,
            turns: &turns,
            max_tokens: SUBTASKS_MAX_TOKENS,
        });
        match reply {
            Ok(text) => parse_subtasks(&text),
            Err(_) => Vec::new(),
        }
    }
}

/// Parse a JSON-array reply, tolerating a Markdown code fence
fn parse_subtasks(reply: &str) -> Vec<String> {
    let mut text = reply.trim();
    // 模型经常无视指令，包一层 ```json 围栏
    if text.starts_with("```") {
        text = text.split("```").nth(1).unwrap_or("");
        text = text.strip_prefix("json").unwrap_or(text);
    }
    serde_json::from_str(text.trim()).unwrap_or_default()
}
