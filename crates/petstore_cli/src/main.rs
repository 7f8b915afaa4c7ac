//! `petstore` command-line entry point.
//!
//! # Responsibility
//! - Build the single `PetProvider` for this process from config and flags.
//! - Print the outcome of one command as a short notification line.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let provider = match config.build_provider() {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match commands::execute(&provider, &cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("event=cli_command module=cli status=error error={err}");
            eprintln!("{}", err.user_message());
            eprintln!("  caused by: {err}");
            ExitCode::FAILURE
        }
    }
}
