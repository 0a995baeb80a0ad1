//! covgate CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use covgate::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match cli::execute(cli).await {
        Ok(code) => code,
        Err(err) => cli::handle_error(&err, json),
    }
}
