use std::io;
use std::process::{Command, ExitStatus};

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("cannot parse command line: {0}")]
    Parse(#[from] shell_words::ParseError),
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status}")]
    Status { program: String, status: ExitStatus },
}

/// Runs a command line to completion.
pub trait Executor {
    fn execute(&self, command_line: &str) -> Result<(), ExecError>;
}

/// Spawns the program directly (no shell) with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ShellExecutor {
    fn execute(&self, command_line: &str) -> Result<(), ExecError> {
        let argv = shell_words::split(command_line)?;
        let Some((program, args)) = argv.split_first() else {
            return Ok(());
        };

        tracing::debug!(program = %program, args = args.len(), "spawning");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Status {
                program: program.clone(),
                status,
            })
        }
    }
}
