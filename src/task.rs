//! 任务数据模型

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// due_date 的存储格式
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 任务优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// 全部取值，按惯用顺序排列
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// 序列化标签（与存储文件中的值一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// 解析标签，大小写敏感，非法值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    /// 全部取值，按生命周期顺序排列
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    /// 序列化标签（与存储文件中的值一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }

    /// 解析标签，大小写敏感，非法值返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Status::Pending),
            "in-progress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }
}

/// 任务数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 任务 ID (UUID v4)
    pub id: String,
    /// 标题（非空，已 trim）
    pub title: String,
    /// 备注/描述
    pub description: String,
    /// 科目（如 "Math", "History"）
    pub subject: String,
    /// 截止日期（YYYY-MM-DD，无则为 null）
    pub due_date: Option<String>,
    /// 优先级
    pub priority: Priority,
    /// 状态
    pub status: Status,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// 解析截止日期；存量数据可能被手工改坏，坏值返回 None
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_due_date)
    }
}

/// 创建任务的输入。priority 以原始字符串传入，在引擎层统一校验
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub due_date: Option<String>,
    pub priority: Option<String>,
}

/// 任务过滤条件（全部可选，AND 组合）
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// 按状态精确匹配
    pub status: Option<String>,
    /// 按优先级精确匹配
    pub priority: Option<String>,
    /// 按科目关键字匹配（大小写不敏感的子串）
    pub subject: Option<String>,
}

/// 任务统计
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
}

/// 解析 YYYY-MM-DD 日期字符串
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DUE_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse("medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        // 大小写敏感
        assert_eq!(Priority::parse("High"), None);
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::High.as_str(), "high");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::parse("pending"), Some(Status::Pending));
        assert_eq!(Status::parse("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("completed"), Some(Status::Completed));
        assert_eq!(Status::parse("done"), None);
        assert_eq!(Status::parse("In-Progress"), None);
        assert_eq!(Status::InProgress.as_str(), "in-progress");
    }

    #[test]
    fn test_status_serde_label() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, Status::InProgress);
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(
            parse_due_date("2025-06-01"),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert_eq!(parse_due_date("2025-13-01"), None);
        assert_eq!(parse_due_date("not-a-date"), None);
        assert_eq!(parse_due_date(""), None);
    }
}
