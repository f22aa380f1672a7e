use budy_store::Config;
use std::path::Path;

/// `budy ask <query>...`
pub fn execute(data_dir: &Path, words: &[String]) -> anyhow::Result<()> {
    let query = words.join(" ");
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("usage: budy ask <question>");
    }
    let config = Config::load(data_dir)?;
    let client = budy_ai::client_from_config(&config);
    let answer = client.ask(query)?;
    println!("{answer}");
    Ok(())
}
