mod cmd_ask;
mod cmd_config;
mod cmd_history;
mod cmd_session;
mod cmd_suggest;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "budy", version, about = "Your AI terminal assistant")]
struct Cli {
    /// Directory holding history.json and config.json (default: ~/.budy)
    #[arg(long, global = true, env = "BUDY_HOME")]
    data_dir: Option<PathBuf>,
    /// Without a subcommand, start an interactive session
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the configured AI backend a single question
    Ask {
        /// Question text
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Show recorded command history
    History {
        /// Maximum number of entries to show (0 = all)
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Only commands recorded in the current directory
        #[arg(long)]
        here: bool,
        /// Output as JSON lines (one entry per line)
        #[arg(long)]
        json: bool,
    },
    /// Print suggestions for the current hour and directory
    Suggest,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("BUDY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(budy_store::data_root);

    match cli.cmd {
        None => cmd_session::execute(&data_dir),
        Some(Command::Ask { query }) => cmd_ask::execute(&data_dir, &query),
        Some(Command::History { limit, here, json }) => {
            cmd_history::execute(&data_dir, limit, here, json)
        }
        Some(Command::Suggest) => cmd_suggest::execute(&data_dir),
        Some(Command::Config { cmd }) => cmd_config::run(cmd, &data_dir),
    }
}
