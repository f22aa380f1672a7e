use budy_store::config::OPENAI_KEY_ENV;
use budy_store::{Config, Provider};
use clap::Subcommand;
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the effective configuration
    Show,
    /// Store the OpenAI API key
    SetKey {
        /// API key (OPENAI_API_KEY still takes precedence when set)
        key: String,
    },
    /// Choose the backend for `?` queries
    Provider {
        /// openai or ollama
        provider: Provider,
    },
    /// Change the Ollama server URL and/or model
    Ollama {
        /// Server URL, e.g. http://localhost:11434
        #[arg(long)]
        url: Option<String>,
        /// Model name, e.g. llama3
        #[arg(long)]
        model: Option<String>,
    },
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, data_dir: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Show => show(data_dir),
        ConfigCmd::SetKey { key } => set_key(data_dir, &key),
        ConfigCmd::Provider { provider } => set_provider(data_dir, provider),
        ConfigCmd::Ollama { url, model } => set_ollama(data_dir, url.as_deref(), model.as_deref()),
    }
}

// ── Command Implementations ──

/// Keep the first and last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        "(not set)".to_string()
    } else if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

/// `budy config show`
pub fn show(data_dir: &Path) -> anyhow::Result<()> {
    let config = Config::load(data_dir)?;
    let env_key = std::env::var(OPENAI_KEY_ENV).ok().filter(|k| !k.is_empty());
    let source = if env_key.is_some() { " (from environment)" } else { "" };

    println!("config file   = {}", Config::path(data_dir).display());
    println!("ai_provider   = {}", config.ai_provider);
    println!("ollama_url    = {}", config.ollama_url);
    println!("ollama_model  = {}", config.ollama_model);
    println!("openai_model  = {}", config.openai_model);
    println!("openai_key    = {}{source}", mask_key(&config.openai_key()));
    Ok(())
}

/// `budy config set-key <key>`
pub fn set_key(data_dir: &Path, key: &str) -> anyhow::Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    let mut config = Config::load(data_dir)?;
    config.set_openai_key(data_dir, key)?;
    println!("openai_key = {}", mask_key(key));
    Ok(())
}

/// `budy config provider <openai|ollama>`
pub fn set_provider(data_dir: &Path, provider: Provider) -> anyhow::Result<()> {
    let mut config = Config::load(data_dir)?;
    config.set_provider(data_dir, provider)?;
    println!("ai_provider = {provider}");
    if provider == Provider::OpenAi && config.openai_key().is_empty() {
        println!("note: no OpenAI key yet; run `budy config set-key <key>` or export {OPENAI_KEY_ENV}");
    }
    Ok(())
}

/// `budy config ollama [--url] [--model]`
pub fn set_ollama(data_dir: &Path, url: Option<&str>, model: Option<&str>) -> anyhow::Result<()> {
    if url.is_none() && model.is_none() {
        anyhow::bail!("nothing to change: pass --url and/or --model");
    }
    let mut config = Config::load(data_dir)?;
    config.set_ollama(data_dir, url, model)?;
    println!("ollama_url = {}", config.ollama_url);
    println!("ollama_model = {}", config.ollama_model);
    Ok(())
}
