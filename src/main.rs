mod calc;
mod cmd;
mod data;
mod ui;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "confcal", about = "conference schedule calendar header")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output on stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml and a sample events.json
    Init,
    /// Print the year / month / day index of all event dates
    Index,
    /// Print the strip for the active month (or year) without the TUI
    Strip {
        /// Date to show instead of the configured one (e.g. 2025-06-11)
        #[arg(short, long)]
        date: Option<String>,
        /// Width of the container the strip is laid out in
        #[arg(short, long, default_value_t = 40.0)]
        width: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    debug!(dir = %data_dir.display(), "using data directory");
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Index) => cmd::index::run(),
        Some(Commands::Strip { date, width }) => cmd::strip::run(date.as_deref(), width),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over the -v/-q counts.
fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = match (quiet, verbose) {
        (q, _) if q >= 2 => "error",
        (1, _) => "warn",
        (_, v) if v >= 3 => "trace",
        (_, 2) => "debug",
        (_, 1) => "info",
        _ => "warn",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_strip_options() {
        let args = ["confcal", "-vv", "strip", "--date", "2025-06-11"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Strip { date, width }) => {
                assert_eq!(date.as_deref(), Some("2025-06-11"));
                assert_eq!(width, 40.0);
            }
            _ => panic!("expected strip subcommand"),
        }
    }

    #[test]
    fn test_cli_defaults_to_tui() {
        let cli = Cli::try_parse_from(["confcal"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, PathBuf::from("./config"));
    }

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does_not_exist");
        assert!(dir_needs_init(&missing));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file.txt"), "data").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }
}
