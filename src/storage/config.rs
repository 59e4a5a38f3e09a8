//! 应用配置（~/.satchel/config.toml，只读）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::satchel_dir;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub web: WebConfig,
}

/// AI 助手配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// 提供方: "gemini" / "openai"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 模型名（不填则用提供方默认）
    #[serde(default)]
    pub model: Option<String>,
    /// API Key（优先读环境变量，这里是兜底）
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_provider() -> String {
    "gemini".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
        }
    }
}

/// Web 服务配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebConfig {
    /// 监听端口（不填则用默认端口）
    #[serde(default)]
    pub port: Option<u16>,
}

/// 获取配置文件路径
fn config_path() -> PathBuf {
    satchel_dir().join("config.toml")
}

/// 加载配置（不存在或解析失败则返回默认值）
pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| toml::from_str(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ai.provider, "gemini");
        assert!(config.ai.model.is_none());
        assert!(config.ai.api_key.is_none());
        assert!(config.web.port.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [ai]
            provider = "openai"
            model = "gpt-4o-mini"

            [web]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.ai.model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.web.port, Some(8080));
    }
}
