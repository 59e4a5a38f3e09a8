//! 任务列表持久化（单个 JSON 数组文件，整读整写）

use std::fs;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use crate::error::Result;
use crate::task::Task;

use super::satchel_dir;

/// 任务持久化后端
///
/// 引擎对集合整读整写：每次操作一次 `load`，每次变更一次 `save`。
pub trait TaskStorage: Send + Sync {
    /// 加载全部任务；存储不存在时初始化为空集合
    fn load(&self) -> Result<Vec<Task>>;
    /// 整体覆盖保存
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// JSON 文件存储，默认位于 ~/.satchel/tasks.json
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 默认数据文件路径
    pub fn default_path() -> PathBuf {
        satchel_dir().join("tasks.json")
    }

    /// 打开默认位置的存储
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            // 首次使用：建目录 + 写入空数组
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, "[]")?;
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(tasks)?;

        // 先写临时文件再 rename，避免写一半被读到
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// 内存存储，测试用
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    tasks: Mutex<Vec<Task>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.lock().unwrap().clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.lock().unwrap() = tasks.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status};
    use chrono::Utc;

    fn sample_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: "Read chapter 4".to_string(),
            description: String::new(),
            subject: "History".to_string(),
            due_date: None,
            priority: Priority::Medium,
            status: Status::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_bootstraps_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        let storage = JsonFileStorage::new(path.clone());

        let tasks = storage.load().unwrap();
        assert!(tasks.is_empty());
        // 文件应当已初始化为空数组
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("tasks.json"));

        let tasks = vec![sample_task("a"), sample_task("b")];
        storage.save(&tasks).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn test_absent_due_date_serialized_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let storage = JsonFileStorage::new(path.clone());

        storage.save(&[sample_task("a")]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"due_date\": null"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();

        let storage = JsonFileStorage::new(path);
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());

        storage.save(&[sample_task("x")]).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "x");
    }
}
