use budy_ai::AiClient;
use budy_core::current_dir_lossy;
use budy_ledger::CommandLedger;
use budy_shell::{Executor, LineReader, LineSource, ShellExecutor, StdinSource};
use budy_store::{Config, FileStorage, Storage};
use budy_suggest::PatternAnalyzer;
use chrono::Local;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "\n> ";

/// What one line of interactive input asks for.
#[derive(Debug, PartialEq)]
pub enum Input {
    Empty,
    Exit,
    Ask(String),
    /// A `!` token the expander could not resolve.
    Unresolved(String),
    ChangeDir(Option<String>),
    Run(String),
}

pub fn classify(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line == "exit" || line == "quit" {
        return Input::Exit;
    }
    if let Some(query) = line.strip_prefix('?') {
        return Input::Ask(query.trim().to_string());
    }
    if line.starts_with('!') {
        return Input::Unresolved(line.to_string());
    }
    if line == "cd" {
        return Input::ChangeDir(None);
    }
    if let Some(dir) = line.strip_prefix("cd ") {
        let dir = dir.trim();
        return Input::ChangeDir((!dir.is_empty()).then(|| dir.to_string()));
    }
    Input::Run(line.to_string())
}

/// `cd` target: no argument and `~` go home, `~/x` is home-relative.
fn cd_target(arg: Option<&str>) -> Option<PathBuf> {
    let home = dirs::home_dir();
    match arg {
        None | Some("~") => home,
        Some(dir) => match dir.strip_prefix("~/") {
            Some(rest) => home.map(|h| h.join(rest)),
            None => Some(PathBuf::from(dir)),
        },
    }
}

/// One interactive read-process-record loop.
pub struct Session<'a, St: Storage, Src: LineSource, W: Write> {
    ledger: CommandLedger<St>,
    reader: LineReader<Src, W>,
    executor: &'a dyn Executor,
    ai: &'a dyn AiClient,
    analyzer: PatternAnalyzer,
}

impl<'a, St: Storage, Src: LineSource, W: Write> Session<'a, St, Src, W> {
    pub fn new(
        ledger: CommandLedger<St>,
        reader: LineReader<Src, W>,
        executor: &'a dyn Executor,
        ai: &'a dyn AiClient,
    ) -> Self {
        Self {
            ledger,
            reader,
            executor,
            ai,
            analyzer: PatternAnalyzer::default(),
        }
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let cwd = current_dir_lossy();
            for s in self.analyzer.suggestions(&self.ledger, Local::now(), &cwd) {
                writeln!(self.reader.writer(), "{s}")?;
            }

            let line = match self.reader.read_line(PROMPT, &self.ledger) {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    tracing::warn!(error = %e, "input failed");
                    writeln!(self.reader.writer(), "Error reading input: {e}")?;
                    break;
                }
            };

            if !self.handle(&line)? {
                break;
            }
        }
        Ok(())
    }

    /// Process one line. Returns `false` when the session should end.
    fn handle(&mut self, line: &str) -> io::Result<bool> {
        match classify(line) {
            Input::Empty => {}
            Input::Exit => return Ok(false),
            Input::Ask(query) if query.is_empty() => {
                writeln!(self.reader.writer(), "Usage: ?<question>")?;
            }
            Input::Ask(query) => match self.ai.ask(&query) {
                Ok(answer) => writeln!(self.reader.writer(), "{answer}")?,
                Err(e) => writeln!(self.reader.writer(), "Error: {e}")?,
            },
            Input::Unresolved(token) => {
                writeln!(self.reader.writer(), "No history entry matches {token}")?;
            }
            Input::ChangeDir(arg) => {
                self.record(line)?;
                match cd_target(arg.as_deref()) {
                    Some(dir) => {
                        if let Err(e) = std::env::set_current_dir(&dir) {
                            writeln!(self.reader.writer(), "cd: {}: {e}", dir.display())?;
                        }
                    }
                    None => writeln!(self.reader.writer(), "cd: home directory not found")?,
                }
            }
            Input::Run(command) => {
                self.record(&command)?;
                if let Err(e) = self.executor.execute(&command) {
                    writeln!(self.reader.writer(), "Error executing command: {e}")?;
                }
            }
        }
        Ok(true)
    }

    fn record(&mut self, command: &str) -> io::Result<()> {
        if let Err(e) = self.ledger.record(command, &current_dir_lossy()) {
            writeln!(
                self.reader.writer(),
                "Warning: Failed to record command in history: {e}"
            )?;
        }
        Ok(())
    }
}

/// `budy` with no subcommand.
pub fn execute(data_dir: &Path) -> anyhow::Result<()> {
    let storage = FileStorage::new(data_dir)?;
    let config = Config::load(data_dir).unwrap_or_else(|e| {
        eprintln!("Warning: ignoring unreadable config: {e}");
        Config::default()
    });
    let ai = budy_ai::client_from_config(&config);
    let executor = ShellExecutor::new();
    let reader = LineReader::new(StdinSource::new(), io::stdout());

    println!(
        "budy v{} - Your AI Terminal Assistant",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type commands normally or prefix with '?' to ask questions");
    println!("Type 'exit' to quit");

    let mut session = Session::new(CommandLedger::open(storage), reader, &executor, ai.as_ref());
    session.run()?;
    Ok(())
}
