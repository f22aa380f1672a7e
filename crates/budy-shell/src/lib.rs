pub mod executor;
pub mod reader;
pub mod recall;

pub use executor::{ExecError, Executor, ShellExecutor};
pub use reader::{LineReader, LineSource, ScriptedSource, StdinSource};
pub use recall::expand;
