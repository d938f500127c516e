//! Nutricart CLI

use std::process::ExitCode;

use clap::Parser;
use nutricart_app::{config, observability};
use tracing::error;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init(&cli.config.logging) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
