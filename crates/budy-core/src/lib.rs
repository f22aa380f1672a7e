pub mod types;

pub use types::*;

/// Storage key under which the command history is persisted.
pub const HISTORY_KEY: &str = "history";

/// Number of recent entries offered for `!n` recall at the prompt.
pub const RECALL_DEPTH: usize = 5;

/// Current working directory as a string, or `""` when it cannot be resolved.
pub fn current_dir_lossy() -> String {
    std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}
