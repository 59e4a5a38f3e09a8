//! Google Gemini provider
//!
//! Talks to the `generateContent` REST endpoint. The API key is read from
//! the `GEMINI_API_KEY` environment variable first, then from `[ai] api_key`
//! in `~/.satchel/config.toml`.

use std::time::Duration;

use serde_json::{json, Value};

use super::{ChatRole, CompletionRequest, Provider};
use crate::error::{Result, SatchelError};
use crate::storage::config::Config;

const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TIMEOUT_SECS: u64 = 30;
const TEMPERATURE: f64 = 0.7;

pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| config.ai.api_key.clone());
        let model = config
            .ai
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    fn build_payload(&self, request: &CompletionRequest) -> Value {
        let contents: Vec<Value> = request
            .turns
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::Assistant => "model",
                    ChatRole::User => "user",
                };
                json!({"role": role, "parts": [{"text": turn.content}]})
            })
            .collect();

        json!({
            "system_instruction": {"parts": [{"text": request.system}]},
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": TEMPERATURE,
            },
        })
    }
}

impl Provider for GeminiProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SatchelError::service("GEMINI_API_KEY environment variable is not set.")
        })?;

        let url = format!("{}/{}:generateContent?key={}", API_BASE, self.model, api_key);
        let response = ureq::post(&url)
            .set("Content-Type", "application/json")
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .send_json(self.build_payload(request))
            .map_err(map_ureq_error)?;

        let body: Value = response
            .into_json()
            .map_err(|e| SatchelError::service(format!("Gemini returned invalid JSON: {}", e)))?;
        extract_text(&body)
            .ok_or_else(|| SatchelError::service("Gemini response contained no candidates."))
    }
}

/// candidates[0].content.parts[0].text
fn extract_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

fn map_ureq_error(err: ureq::Error) -> SatchelError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            SatchelError::service(format!("Gemini API error {}: {}", code, body))
        }
        ureq::Error::Transport(transport) => {
            SatchelError::service(format!("Gemini request failed: {}", transport))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatTurn;

    #[test]
    fn test_build_payload_shape() {
        let provider = GeminiProvider::new(Some("k".to_string()), DEFAULT_MODEL);
        let turns = vec![
            ChatTurn::user("first question"),
            ChatTurn::assistant("an answer"),
            ChatTurn::user("follow-up"),
        ];
        let payload = provider.build_payload(&CompletionRequest {
            system: "persona",
            turns: &turns,
            max_tokens: 64,
        });

        assert_eq!(
            payload["system_instruction"]["parts"][0]["text"],
            "persona"
        );
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 64);

        let contents = payload["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        // assistant 轮次映射为 Gemini 的 "model" 角色
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "an answer");
        assert_eq!(contents[2]["role"], "user");
    }

    #[test]
    fn test_extract_text() {
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "hello there"}]}}
            ]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("hello there"));

        assert_eq!(extract_text(&serde_json::json!({})), None);
        assert_eq!(extract_text(&serde_json::json!({"candidates": []})), None);
    }

    #[test]
    fn test_missing_key_is_service_error() {
        let provider = GeminiProvider::new(None, DEFAULT_MODEL);
        let err = provider
            .complete(&CompletionRequest {
                system: "persona",
                turns: &[ChatTurn::user("hi")],
                max_tokens: 8,
            })
            .unwrap_err();
        assert!(matches!(err, SatchelError::Service(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
