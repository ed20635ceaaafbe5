mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;

fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    if commands::run(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
