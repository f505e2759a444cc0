use anyhow::Result;
use colored::Colorize;

use tournament_uploader::cli::Command;
use tournament_uploader::{handle_completions, handle_inspect, handle_upload, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Upload(args) => handle_upload(args),
        Command::Inspect { tournament } => handle_inspect(tournament),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
