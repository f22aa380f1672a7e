use crate::{post_json, AiClient, AiError, SYSTEM_PROMPT};
use budy_store::config::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    system: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Local Ollama server, `/api/generate` without streaming.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    server_url: String,
    model: String,
}

impl OllamaClient {
    /// Blank arguments fall back to the local default server and model.
    pub fn new(server_url: &str, model: &str) -> Self {
        let server_url = match server_url.trim() {
            "" => DEFAULT_OLLAMA_URL,
            url => url,
        };
        let model = match model.trim() {
            "" => DEFAULT_OLLAMA_MODEL,
            m => m,
        };
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AiClient for OllamaClient {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn ask(&self, query: &str) -> Result<String, AiError> {
        let body = serde_json::to_string(&GenerateRequest {
            model: &self.model,
            prompt: query,
            stream: false,
            system: SYSTEM_PROMPT,
        })?;
        let url = format!("{}/api/generate", self.server_url);
        let text = post_json(self.name(), &url, None, body)?;
        let reply: GenerateResponse = serde_json::from_str(&text)?;
        Ok(reply.response)
    }
}
