use budy_core::{CommandEntry, HistoryView, HISTORY_KEY};
use budy_store::{Storage, StoreError};

/// The append-only command history, persisted in full under `"history"`.
pub struct CommandLedger<S: Storage> {
    storage: S,
    entries: Vec<CommandEntry>,
}

impl<S: Storage> CommandLedger<S> {
    /// Load the persisted history. Any load failure starts an empty ledger.
    pub fn open(storage: S) -> Self {
        let entries = match storage.load::<Vec<CommandEntry>>(HISTORY_KEY) {
            Ok(entries) => entries,
            Err(StoreError::NotFound(_)) => Vec::new(),
            Err(e) => {
                tracing::debug!(error = %e, "history unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(entries = entries.len(), "history loaded");
        Self { storage, entries }
    }

    /// Record `command` as run now in `directory`.
    ///
    /// The entry stays in memory even when persisting fails; the storage error
    /// is returned for the caller to report.
    pub fn record(&mut self, command: &str, directory: &str) -> Result<(), StoreError> {
        self.append(CommandEntry::new(command, directory))
    }

    /// Append a pre-built entry and rewrite the persisted history.
    pub fn append(&mut self, entry: CommandEntry) -> Result<(), StoreError> {
        self.entries.push(entry);
        self.storage.save(HISTORY_KEY, &self.entries).map_err(|e| {
            tracing::warn!(error = %e, entries = self.entries.len(), "history not persisted");
            e
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> HistoryView for CommandLedger<S> {
    fn all(&self) -> &[CommandEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budy_store::{FileStorage, MemoryStorage};

    fn commands(entries: &[CommandEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.command.as_str()).collect()
    }

    #[test]
    fn empty_storage_opens_empty() {
        let ledger = CommandLedger::open(MemoryStorage::new());
        assert!(ledger.is_empty());
        assert!(ledger.all().is_empty());
        assert!(ledger.recent(5).is_empty());
        assert!(ledger.in_directory("/tmp").is_empty());
    }

    #[test]
    fn malformed_history_opens_empty() {
        let storage = MemoryStorage::new();
        storage.insert_raw(HISTORY_KEY, "{\"not\": \"a list\"}");
        let ledger = CommandLedger::open(storage);
        assert!(ledger.is_empty());
    }

    #[test]
    fn record_preserves_call_order() {
        let mut ledger = CommandLedger::open(MemoryStorage::new());
        for cmd in ["ls -la", "cd /tmp", "echo test"] {
            ledger.record(cmd, "/home/u").unwrap();
        }
        assert_eq!(ledger.len(), 3);
        assert_eq!(commands(ledger.all()), ["ls -la", "cd /tmp", "echo test"]);
        assert!(ledger.all().iter().all(|e| e.directory == "/home/u"));
        assert!(ledger.all()[0].timestamp <= ledger.all()[2].timestamp);
    }

    #[test]
    fn every_record_rewrites_full_history() {
        let mut ledger = CommandLedger::open(MemoryStorage::new());
        ledger.record("a", "/").unwrap();
        ledger.record("b", "/").unwrap();
        assert_eq!(ledger.storage().save_count(), 2);

        let persisted: Vec<CommandEntry> = ledger.storage().load(HISTORY_KEY).unwrap();
        assert_eq!(commands(&persisted), ["a", "b"]);
    }

    #[test]
    fn persist_failure_keeps_entry_in_memory() {
        let storage = MemoryStorage::new();
        storage.set_fail_saves(true);
        let mut ledger = CommandLedger::open(storage);

        let err = ledger.record("git status", "/repo").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.recent(1)[0].command, "git status");

        ledger.storage().set_fail_saves(false);
        ledger.record("git diff", "/repo").unwrap();
        let persisted: Vec<CommandEntry> = ledger.storage().load(HISTORY_KEY).unwrap();
        assert_eq!(commands(&persisted), ["git status", "git diff"]);
    }

    #[test]
    fn recent_and_directory_views() {
        let mut ledger = CommandLedger::open(MemoryStorage::new());
        ledger.record("make", "/a").unwrap();
        ledger.record("ls", "/b").unwrap();
        ledger.record("make test", "/a").unwrap();
        ledger.record("pwd", "").unwrap();

        assert_eq!(commands(ledger.recent(2)), ["make test", "pwd"]);
        assert_eq!(ledger.recent(10), ledger.all());

        let in_a: Vec<_> = ledger.in_directory("/a").iter().map(|e| e.command.as_str()).collect();
        assert_eq!(in_a, ["make", "make test"]);
        assert_eq!(ledger.in_directory("").len(), 1);
    }

    #[test]
    fn history_survives_reopen_from_files() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut ledger = CommandLedger::open(FileStorage::new(tmp.path()).unwrap());
            ledger.record("cargo build", "/src").unwrap();
            ledger.record("cargo test", "/src").unwrap();
        }
        assert!(tmp.path().join("history.json").is_file());

        let ledger = CommandLedger::open(FileStorage::new(tmp.path()).unwrap());
        assert_eq!(commands(ledger.all()), ["cargo build", "cargo test"]);
        assert_eq!(ledger.all()[1].directory, "/src");
    }
}
