use std::{error::Error, io};

use clap::Subcommand;
use medicart::context::AppContext;

use crate::config::AppConfig;

mod cart;
mod reminders;
mod render;
mod watch;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Inspect and edit the medication cart
    Cart(cart::CartCommand),
    /// Manage dosage reminders
    Reminders(reminders::RemindersCommand),
    /// Show the navigation badge counts
    Badges,
    /// Print the badge counts whenever another process changes the store
    Watch(watch::WatchArgs),
}

pub(crate) fn run(config: AppConfig) -> Result<(), String> {
    let (app, storage) = AppContext::from_data_dir(&config.data_dir)
        .map_err(|error| describe("failed to initialise", &error))?;

    let mut out = io::stdout().lock();

    match config.command {
        Commands::Cart(command) => cart::run(command, &app, &mut out),
        Commands::Reminders(command) => reminders::run(command, &app, &mut out),
        Commands::Badges => {
            render::write_badges(&mut out, app.badge_counts()).map_err(output_error)
        }
        Commands::Watch(args) => watch::run(&args, &app, &storage, &mut out),
    }
}

/// Render an error and its sources on one line.
pub(crate) fn describe(context: &str, error: &dyn Error) -> String {
    let mut message = format!("{context}: {error}");
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adapter"
)]
pub(crate) fn output_error(error: io::Error) -> String {
    describe("failed to write output", &error)
}
