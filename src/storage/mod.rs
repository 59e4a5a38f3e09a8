pub mod config;
pub mod tasks;

use std::path::PathBuf;

/// 获取 ~/.satchel/ 目录路径
pub fn satchel_dir() -> PathBuf {
    dirs::home_dir()
        .expect("Cannot find home directory")
        .join(".satchel")
}
