use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use pomodoro_core::AppPaths;

mod commands;

#[derive(Parser)]
#[command(name = "pomodoro-cli", version, about = "Pomodoro timer CLI")]
struct Cli {
    /// Use this config file instead of the one in the data directory
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Free-text notes
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Notification sounds
    Sounds {
        #[command(subcommand)]
        action: commands::sounds::SoundsAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut paths = AppPaths::discover()?;
    if let Some(path) = cli.config_file {
        paths = paths.with_config_file(path);
    }

    match cli.command {
        Commands::Config { action } => commands::config::run(&paths, action),
        Commands::Notes { action } => commands::notes::run(&paths, action),
        Commands::Stats { action } => commands::stats::run(&paths, action),
        Commands::Sounds { action } => commands::sounds::run(&paths, action),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = pomodoro_core::logging::init(None, cli.verbose) {
        eprintln!("warning: {e}");
    }

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
