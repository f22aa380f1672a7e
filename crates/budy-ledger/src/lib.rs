pub mod ledger;

pub use budy_core::{CommandEntry, HistoryView};
pub use ledger::CommandLedger;
