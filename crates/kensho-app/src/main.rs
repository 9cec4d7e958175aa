// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kensho — identity-document preprocessing and field validation
//
// Entry point. Initialises logging, parses the command line, and runs the
// selected subcommand. Failures are reported in plain language on stderr.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use kensho_core::human_errors::humanize_error;

use cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}
