//! OpenAI-compatible provider (chat completions)
//!
//! The API key is read from the `OPENAI_API_KEY` environment variable first,
//! then from `[ai] api_key` in `~/.satchel/config.toml`.

use std::time::Duration;

use serde_json::{json, Value};

use super::{ChatRole, CompletionRequest, Provider};
use crate::error::{Result, SatchelError};
use crate::storage::config::Config;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TIMEOUT_SECS: u64 = 30;
const TEMPERATURE: f64 = 0.7;

pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
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
        let mut messages = vec![json!({"role": "system", "content": request.system})];
        for turn in request.turns {
            let role = match turn.role {
                ChatRole::Assistant => "assistant",
                ChatRole::User => "user",
            };
            messages.push(json!({"role": role, "content": turn.content}));
        }

        json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": TEMPERATURE,
        })
    }
}

impl Provider for OpenAiProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SatchelError::service("OPENAI_API_KEY environment variable is not set.")
        })?;

        let response = ureq::post(API_URL)
            .set("Authorization", &format!("Bearer {}", api_key))
            .set("Content-Type", "application/json")
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .send_json(self.build_payload(request))
            .map_err(map_ureq_error)?;

        let body: Value = response
            .into_json()
            .map_err(|e| SatchelError::service(format!("OpenAI returned invalid JSON: {}", e)))?;
        extract_text(&body)
            .ok_or_else(|| SatchelError::service("OpenAI response contained no choices."))
    }
}

/// choices[0].message.content
fn extract_text(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn map_ureq_error(err: ureq::Error) -> SatchelError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            SatchelError::service(format!("OpenAI API error {}: {}", code, body))
        }
        ureq::Error::Transport(transport) => {
            SatchelError::service(format!("OpenAI request failed: {}", transport))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatTurn;

    #[test]
    fn test_build_payload_shape() {
        let provider = OpenAiProvider::new(Some("k".to_string()), "gpt-4o-mini");
        let turns = vec![ChatTurn::user("hello"), ChatTurn::assistant("hi!")];
        let payload = provider.build_payload(&CompletionRequest {
            system: "persona",
            turns: &turns,
            max_tokens: 32,
        });

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["max_tokens"], 32);

        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "persona");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
    }

    #[test]
    fn test_extract_text() {
        let body = serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "sure thing"}}
            ]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("sure thing"));
        assert_eq!(extract_text(&serde_json::json!({"choices": []})), None);
    }

    #[test]
    fn test_missing_key_is_service_error() {
        let provider = OpenAiProvider::new(None, DEFAULT_MODEL);
        let err = provider
            .complete(&CompletionRequest {
                system: "persona",
                turns: &[ChatTurn::user("hi")],
                max_tokens: 8,
            })
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
