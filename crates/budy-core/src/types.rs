use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One recorded command occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandEntry {
    pub command: String,
    pub timestamp: DateTime<Local>,
    /// Working directory at record time; empty if it could not be resolved.
    pub directory: String,
}

impl CommandEntry {
    pub fn new(command: &str, directory: &str) -> Self {
        Self::at(command, directory, Local::now())
    }

    pub fn at(command: &str, directory: &str, timestamp: DateTime<Local>) -> Self {
        Self {
            command: command.to_string(),
            timestamp,
            directory: directory.to_string(),
        }
    }
}

/// Read-only access to an ordered history, oldest entry first.
pub trait HistoryView {
    fn all(&self) -> &[CommandEntry];

    /// The last `min(n, len)` entries, still oldest-to-newest.
    fn recent(&self, n: usize) -> &[CommandEntry] {
        let all = self.all();
        &all[all.len().saturating_sub(n)..]
    }

    /// Entries recorded in `dir`, order preserved.
    fn in_directory(&self, dir: &str) -> Vec<&CommandEntry> {
        self.all().iter().filter(|e| e.directory == dir).collect()
    }
}

impl HistoryView for Vec<CommandEntry> {
    fn all(&self) -> &[CommandEntry] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(cmds: &[(&str, &str)]) -> Vec<CommandEntry> {
        cmds.iter().map(|(c, d)| CommandEntry::new(c, d)).collect()
    }

    #[test]
    fn recent_keeps_chronological_order() {
        let h = history(&[("a", "/"), ("b", "/"), ("c", "/")]);
        let cmds: Vec<_> = h.recent(2).iter().map(|e| e.command.as_str()).collect();
        assert_eq!(cmds, ["b", "c"]);
    }

    #[test]
    fn recent_larger_than_history_returns_everything() {
        let h = history(&[("a", "/"), ("b", "/")]);
        assert_eq!(h.recent(5), h.all());
        assert_eq!(h.recent(2), h.all());
        assert!(h.recent(0).is_empty());
    }

    #[test]
    fn in_directory_is_an_ordered_subsequence() {
        let h = history(&[("a", "/x"), ("b", "/y"), ("c", "/x"), ("d", "")]);
        let cmds: Vec<_> = h.in_directory("/x").iter().map(|e| e.command.as_str()).collect();
        assert_eq!(cmds, ["a", "c"]);
        assert_eq!(h.in_directory("").len(), 1);
        assert!(h.in_directory("/z").is_empty());
    }

    #[test]
    fn empty_history_views_are_empty() {
        let h: Vec<CommandEntry> = Vec::new();
        assert!(h.recent(5).is_empty());
        assert!(h.in_directory("/tmp").is_empty());
    }

    #[test]
    fn entry_serializes_with_rfc3339_timestamp() {
        let entry = CommandEntry::new("ls -la", "/tmp");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["command"], "ls -la");
        assert_eq!(json["directory"], "/tmp");
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());

        let back: CommandEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
