use budy_core::current_dir_lossy;
use budy_ledger::CommandLedger;
use budy_store::FileStorage;
use budy_suggest::PatternAnalyzer;
use chrono::Local;
use std::path::Path;

/// `budy suggest`
pub fn execute(data_dir: &Path) -> anyhow::Result<()> {
    let ledger = CommandLedger::open(FileStorage::new(data_dir)?);
    let suggestions =
        PatternAnalyzer::default().suggestions(&ledger, Local::now(), &current_dir_lossy());
    if suggestions.is_empty() {
        println!("(no suggestions yet)");
    }
    for s in suggestions {
        println!("{s}");
    }
    Ok(())
}
