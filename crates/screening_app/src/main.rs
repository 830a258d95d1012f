mod app;
mod cli;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;
use screening_engine::ClientConfig;
use screening_logging::screening_error;

use crate::cli::Cli;
use crate::logging::LogDestination;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    });

    let result = ClientConfig::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| app::run(cli.command, config));
    match result {
        Ok(code) => code,
        Err(err) => {
            screening_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
