use std::io::Write;

use clap::{Args, Subcommand};
use medicart::{
    context::AppContext,
    domain::reminders::{
        ReminderTime, ReminderTimes,
        models::{DEFAULT_FREQUENCY, NewReminder, ReminderUpdate, ReminderUuid},
    },
};

use super::{describe, output_error, render};

#[derive(Debug, Args)]
pub(crate) struct RemindersCommand {
    #[command(subcommand)]
    command: RemindersSubcommand,
}

#[derive(Debug, Subcommand)]
enum RemindersSubcommand {
    /// List reminders
    List,
    /// Create a twice-daily reminder for every cart medication without one
    FromCart,
    /// Create a reminder by hand
    Add(AddArgs),
    /// Enable or pause a reminder
    Toggle(IdArgs),
    /// Change fields of a reminder
    Edit(EditArgs),
    /// Delete a reminder
    Delete(IdArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    medication: String,

    #[arg(long)]
    dosage: String,

    #[arg(long, default_value = DEFAULT_FREQUENCY)]
    frequency: String,

    /// Reminder time (HH:MM), repeatable; defaults to 09:00
    #[arg(long = "time")]
    times: Vec<ReminderTime>,
}

#[derive(Debug, Args)]
struct IdArgs {
    id: ReminderUuid,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: ReminderUuid,

    #[arg(long)]
    medication: Option<String>,

    #[arg(long)]
    dosage: Option<String>,

    #[arg(long)]
    frequency: Option<String>,

    /// Replacement reminder times (HH:MM), repeatable
    #[arg(long = "time")]
    times: Vec<ReminderTime>,

    #[arg(long, conflicts_with = "disable")]
    enable: bool,

    #[arg(long)]
    disable: bool,
}

impl EditArgs {
    fn into_update(self) -> (ReminderUuid, ReminderUpdate) {
        let enabled = match (self.enable, self.disable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        let update = ReminderUpdate {
            medication: self.medication,
            dosage: self.dosage,
            frequency: self.frequency,
            times: (!self.times.is_empty()).then_some(self.times),
            enabled,
        };

        (self.id, update)
    }
}

pub(crate) fn run(
    command: RemindersCommand,
    app: &AppContext,
    out: &mut impl Write,
) -> Result<(), String> {
    let view = app.mount_reminders_view();

    match command.command {
        RemindersSubcommand::List => {}
        RemindersSubcommand::FromCart => {
            let created = app
                .reminders
                .create_from_cart(&app.carts.items())
                .map_err(|error| describe("failed to create reminders", &error))?;

            writeln!(out, "Created {created} reminder(s) from the cart").map_err(output_error)?;
        }
        RemindersSubcommand::Add(args) => {
            let times = if args.times.is_empty() {
                ReminderTimes::default()
            } else {
                ReminderTimes::try_from(args.times)
                    .map_err(|error| describe("invalid times", &error))?
            };

            let reminder = app
                .reminders
                .create(NewReminder {
                    medication: args.medication,
                    dosage: args.dosage,
                    frequency: args.frequency,
                    times,
                })
                .map_err(|error| describe("failed to create reminder", &error))?;

            render::write_reminder(out, "Created", &reminder).map_err(output_error)?;
        }
        RemindersSubcommand::Toggle(args) => {
            let toggled = app
                .reminders
                .toggle(args.id)
                .map_err(|error| describe("failed to toggle reminder", &error))?;

            report(out, "Toggled", args.id, toggled.as_ref())?;
        }
        RemindersSubcommand::Edit(args) => {
            let (id, update) = args.into_update();

            let updated = app
                .reminders
                .update(id, update)
                .map_err(|error| describe("failed to update reminder", &error))?;

            report(out, "Updated", id, updated.as_ref())?;
        }
        RemindersSubcommand::Delete(args) => {
            let deleted = app
                .reminders
                .delete(args.id)
                .map_err(|error| describe("failed to delete reminder", &error))?;

            report(out, "Deleted", args.id, deleted.as_ref())?;
        }
    }

    render::write_reminders(out, &view.records()).map_err(output_error)
}

fn report(
    out: &mut impl Write,
    verb: &str,
    id: ReminderUuid,
    reminder: Option<&medicart::domain::reminders::models::Reminder>,
) -> Result<(), String> {
    match reminder {
        Some(reminder) => render::write_reminder(out, verb, reminder),
        None => writeln!(out, "No reminder with id {id}"),
    }
    .map_err(output_error)
}
