//! Medicart CLI

use std::process::ExitCode;

use tracing::error;

use crate::config::AppConfig;

mod cli;
mod config;
mod observability;

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    match cli::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");

            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the user on stderr"
            )]
            {
                eprintln!("error: {message}");
            }

            ExitCode::FAILURE
        }
    }
}
