use crate::recall::expand;
use budy_core::{HistoryView, RECALL_DEPTH};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Raw line input. `Ok(None)` signals end of input.
pub trait LineSource {
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Buffered standard input.
#[derive(Debug)]
pub struct StdinSource {
    stdin: io::Stdin,
}

impl StdinSource {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinSource {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        match self.stdin.lock().read_line(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf)),
        }
    }
}

/// Pre-recorded lines, then end of input.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Prompt-and-read loop step with recent-command hints and `!` recall.
pub struct LineReader<S, W> {
    source: S,
    out: W,
    depth: usize,
}

impl<S: LineSource, W: Write> LineReader<S, W> {
    pub fn new(source: S, out: W) -> Self {
        Self {
            source,
            out,
            depth: RECALL_DEPTH,
        }
    }

    /// The writer hints and prompts go to.
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.out)
    }

    /// Show recent commands, prompt, and read one trimmed line. Recall tokens
    /// that resolve are echoed and returned as the underlying command.
    pub fn read_line(&mut self, prompt: &str, history: &impl HistoryView) -> io::Result<String> {
        let recent = history.recent(self.depth);
        if !recent.is_empty() {
            writeln!(self.out, "\nRecent commands (use !n to recall):")?;
            // !1 is the newest entry, matching the expander.
            for (i, entry) in recent.iter().rev().enumerate() {
                writeln!(self.out, "  !{}: {}", i + 1, entry.command)?;
            }
        }

        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let raw = self
            .source
            .read_line()?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"))?;
        let input = raw.trim();

        if input.starts_with('!') {
            let resolved = expand(input, recent);
            if resolved != input {
                writeln!(self.out, "Executing: {resolved}")?;
                return Ok(resolved);
            }
        }
        Ok(input.to_string())
    }
}
