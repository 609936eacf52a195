use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod domain;
mod services;
mod toon;

use cli::Cli;
use commands::{handle_tool_commands, handle_verify_commands, Verdict};
use services::config::load_config;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<Verdict> {
    let config = load_config(cli.config.as_deref())?;

    if let Some(verdict) = handle_verify_commands(cli, &config)? {
        return Ok(verdict);
    }
    if let Some(verdict) = handle_tool_commands(cli, &config)? {
        return Ok(verdict);
    }
    anyhow::bail!("unhandled command")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(Verdict::Passed) => ExitCode::SUCCESS,
        Ok(Verdict::Failed) => ExitCode::from(1),
        Err(e) => {
            tracing::debug!(error = ?e, "fatal");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
