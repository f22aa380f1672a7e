use crate::{post_json, AiClient, AiError, SYSTEM_PROMPT};
use budy_store::config::DEFAULT_OPENAI_MODEL;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

/// OpenAI chat completions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let model = match model.trim() {
            "" => DEFAULT_OPENAI_MODEL,
            m => m,
        };
        Self {
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a compatible server instead of api.openai.com.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl AiClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn ask(&self, query: &str) -> Result<String, AiError> {
        if !self.has_key() {
            return Err(AiError::MissingApiKey);
        }
        let body = serde_json::to_string(&ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                Message {
                    role: "user".into(),
                    content: query.into(),
                },
            ],
        })?;
        let url = format!("{}/v1/chat/completions", self.base_url);
        let text = post_json(self.name(), &url, Some(&self.api_key), body)?;
        let reply: ChatResponse = serde_json::from_str(&text)?;
        Ok(reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }
}
