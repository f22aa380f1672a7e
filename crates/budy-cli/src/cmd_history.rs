use budy_core::{current_dir_lossy, CommandEntry, HistoryView};
use budy_ledger::CommandLedger;
use budy_store::FileStorage;
use std::path::Path;

/// Pick the last `limit` entries (0 = all), optionally only those from `dir`.
fn select<'a>(history: &'a impl HistoryView, limit: usize, dir: Option<&str>) -> Vec<&'a CommandEntry> {
    let mut entries: Vec<&CommandEntry> = match dir {
        Some(dir) => history.in_directory(dir),
        None => history.all().iter().collect(),
    };
    if limit > 0 && entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
    entries
}

fn format_entry(entry: &CommandEntry, show_dir: bool) -> String {
    let ts = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    if show_dir && !entry.directory.is_empty() {
        format!("{ts}  {}  ({})", entry.command, entry.directory)
    } else {
        format!("{ts}  {}", entry.command)
    }
}

/// `budy history [--limit N] [--here] [--json]`
pub fn execute(data_dir: &Path, limit: usize, here: bool, json: bool) -> anyhow::Result<()> {
    let ledger = CommandLedger::open(FileStorage::new(data_dir)?);
    let cwd = here.then(current_dir_lossy);
    let entries = select(&ledger, limit, cwd.as_deref());

    if entries.is_empty() {
        if !json {
            println!("(no history)");
        }
        return Ok(());
    }
    for entry in entries {
        if json {
            println!("{}", serde_json::to_string(entry)?);
        } else {
            println!("{}", format_entry(entry, !here));
        }
    }
    Ok(())
}
