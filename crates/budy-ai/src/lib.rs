pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use budy_store::{Config, Provider};
use std::time::Duration;

/// Instruction sent with every query, whichever backend answers it.
pub const SYSTEM_PROMPT: &str = "You are a helpful terminal assistant for Unix/Linux/macOS systems. Provide concise answers for command line usage.";

const TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("OpenAI API key not set (use export OPENAI_API_KEY=your_key)")]
    MissingApiKey,
    #[error("failed to connect to {backend}: {source}")]
    Connect {
        backend: &'static str,
        #[source]
        source: ureq::Error,
    },
    #[error("failed to read {backend} response (status {status}): {source}")]
    Read {
        backend: &'static str,
        status: u16,
        #[source]
        source: ureq::Error,
    },
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A language-model backend answering free-form questions.
pub trait AiClient {
    fn name(&self) -> &'static str;
    fn ask(&self, query: &str) -> Result<String, AiError>;
}

/// Build the client selected by `config.ai_provider`.
pub fn client_from_config(config: &Config) -> Box<dyn AiClient> {
    match config.ai_provider {
        Provider::Ollama => Box::new(OllamaClient::new(&config.ollama_url, &config.ollama_model)),
        Provider::OpenAi => Box::new(OpenAiClient::new(
            &config.openai_key(),
            &config.openai_model,
        )),
    }
}

/// POST a JSON body and return the response text of a 200 reply.
fn post_json(
    backend: &'static str,
    url: &str,
    bearer: Option<&str>,
    body: String,
) -> Result<String, AiError> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(TIMEOUT))
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut request = agent.post(url).header("Content-Type", "application/json");
    if let Some(token) = bearer {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    tracing::debug!(backend, url, bytes = body.len(), "sending query");
    let mut response = request
        .send(body)
        .map_err(|source| AiError::Connect { backend, source })?;
    let status = response.status().as_u16();
    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|source| AiError::Read {
            backend,
            status,
            source,
        })?;

    if status != 200 {
        return Err(AiError::Api { status, body: text });
    }
    Ok(text)
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer exactly one HTTP request with `status` and `body`. The join
    /// handle yields the raw request text.
    pub fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        serve_raw(format!(
            "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
    }

    /// Answer exactly one HTTP request with a prebuilt response, then close.
    pub fn serve_raw(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn read_request(stream: &mut impl Read) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_selects_backend() {
        let mut config = Config::default();
        assert_eq!(client_from_config(&config).name(), "Ollama");
        config.ai_provider = Provider::OpenAi;
        assert_eq!(client_from_config(&config).name(), "OpenAI");
    }

    #[test]
    fn api_error_message_carries_status_and_body() {
        let err = AiError::Api {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "API error (status 500): boom");
    }

    #[test]
    fn truncated_body_is_a_read_error() {
        let (url, server) = test_server::serve_raw(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\nConnection: close\r\n\r\n{\"resp".to_string(),
        );
        let url = format!("{url}/api/generate");
        let err = post_json("Ollama", &url, None, "{}".into()).unwrap_err();
        server.join().unwrap();

        assert!(
            matches!(err, AiError::Read { backend: "Ollama", status: 200, .. }),
            "{err:?}"
        );
        assert!(err.to_string().starts_with("failed to read Ollama response (status 200)"));
    }
}
