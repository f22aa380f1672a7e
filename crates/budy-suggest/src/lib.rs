use budy_core::HistoryView;
use chrono::{DateTime, Local, Timelike};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Repeated at the current hour of day.
    TimeOfDay,
    /// Repeated in the current working directory.
    Directory,
}

/// A derived hint, recomputed every prompt cycle and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub command: String,
    pub count: usize,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let place = match self.kind {
            SuggestionKind::TimeOfDay => "at this hour",
            SuggestionKind::Directory => "in this directory",
        };
        write!(
            f,
            "Suggestion: {} (used {} times {place})",
            self.command, self.count
        )
    }
}

/// Frequency-based suggestions over the command history.
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    /// A command must repeat at least this often to be suggested.
    pub min_count: usize,
    /// Keep at most this many suggestions, dropping from the front.
    pub limit: usize,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self {
            min_count: 2,
            limit: 3,
        }
    }
}

impl PatternAnalyzer {
    /// Time-of-day suggestions followed by directory suggestions, truncated to
    /// the last `limit` entries.
    pub fn suggestions(
        &self,
        history: &impl HistoryView,
        now: DateTime<Local>,
        cwd: &str,
    ) -> Vec<Suggestion> {
        let mut out = self.time_suggestions(history, now.hour());
        out.extend(self.directory_suggestions(history, cwd));
        if out.len() > self.limit {
            out.drain(..out.len() - self.limit);
        }
        out
    }

    pub fn time_suggestions(&self, history: &impl HistoryView, hour: u32) -> Vec<Suggestion> {
        let commands = history
            .all()
            .iter()
            .filter(|e| e.timestamp.hour() == hour)
            .map(|e| e.command.as_str());
        self.frequent(commands, SuggestionKind::TimeOfDay)
    }

    pub fn directory_suggestions(&self, history: &impl HistoryView, cwd: &str) -> Vec<Suggestion> {
        let entries = history.in_directory(cwd);
        let commands = entries.iter().map(|e| e.command.as_str());
        self.frequent(commands, SuggestionKind::Directory)
    }

    /// Commands seen at least `min_count` times, in command-text order.
    fn frequent<'a>(
        &self,
        commands: impl Iterator<Item = &'a str>,
        kind: SuggestionKind,
    ) -> Vec<Suggestion> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for cmd in commands {
            *counts.entry(cmd).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count >= self.min_count)
            .map(|(cmd, count)| Suggestion {
                kind,
                command: cmd.to_string(),
                count,
            })
            .collect()
    }
}
