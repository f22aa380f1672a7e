use crate::file::write_atomic;
use crate::StoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable that overrides the stored OpenAI key.
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Which backend answers `?` queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[default]
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            other => Err(format!("unknown AI provider '{other}' (expected openai or ollama)")),
        }
    }
}

/// Blank or null provider in the file means "use the default".
fn provider_or_default<'de, D>(de: D) -> Result<Provider, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Provider::default()),
        Some(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Application configuration stored in `<data_dir>/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default, deserialize_with = "provider_or_default")]
    pub ai_provider: Provider,
    #[serde(default)]
    pub ollama_url: String,
    #[serde(default)]
    pub ollama_model: String,
    #[serde(default)]
    pub openai_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            ai_provider: Provider::Ollama,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl Config {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.json")
    }

    /// Read config from `<data_dir>/config.json`. Returns defaults if the file doesn't exist.
    pub fn load(data_dir: &Path) -> Result<Self, StoreError> {
        let path = Self::path(data_dir);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let mut config: Config = serde_json::from_str(&content)?;
        config.apply_defaults();
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(&Self::path(data_dir), json.as_bytes())?;
        Ok(())
    }

    fn apply_defaults(&mut self) {
        if self.ollama_url.trim().is_empty() {
            self.ollama_url = DEFAULT_OLLAMA_URL.to_string();
        }
        if self.ollama_model.trim().is_empty() {
            self.ollama_model = DEFAULT_OLLAMA_MODEL.to_string();
        }
        if self.openai_model.trim().is_empty() {
            self.openai_model = DEFAULT_OPENAI_MODEL.to_string();
        }
    }

    /// A non-empty environment value wins over the stored key.
    pub fn resolve_openai_key(&self, env_value: Option<&str>) -> String {
        match env_value {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => self.openai_api_key.clone(),
        }
    }

    pub fn openai_key(&self) -> String {
        let env = std::env::var(OPENAI_KEY_ENV).ok();
        self.resolve_openai_key(env.as_deref())
    }

    pub fn set_openai_key(&mut self, data_dir: &Path, key: &str) -> Result<(), StoreError> {
        self.openai_api_key = key.to_string();
        self.save(data_dir)
    }

    pub fn set_provider(&mut self, data_dir: &Path, provider: Provider) -> Result<(), StoreError> {
        self.ai_provider = provider;
        self.save(data_dir)
    }

    /// Blank arguments leave the current value in place.
    pub fn set_ollama(
        &mut self,
        data_dir: &Path,
        url: Option<&str>,
        model: Option<&str>,
    ) -> Result<(), StoreError> {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.ollama_url = url.trim().to_string();
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.ollama_model = model.trim().to_string();
        }
        self.save(data_dir)
    }
}
