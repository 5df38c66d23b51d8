//! Table rendering for command output.

use std::io::{self, Write};

use medicart::{
    counters::BadgeCounts,
    domain::{
        carts::{compute_totals, models::CartItem, totals::format_usd},
        reminders::models::Reminder,
    },
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

pub(crate) fn write_cart(out: &mut impl Write, cart: &[CartItem]) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }

    let mut builder = Builder::default();

    builder.push_record([
        "#",
        "Medication",
        "Dosage",
        "Frequency",
        "Duration",
        "Price",
        "Qty",
        "Total",
    ]);

    for (position, item) in (1..).zip(cart) {
        builder.push_record([
            position.to_string(),
            item.name.clone(),
            item.dosage.clone(),
            item.frequency.clone(),
            item.duration.clone(),
            format_usd(item.price),
            item.effective_quantity().to_string(),
            format_usd(item.line_total()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..8), Alignment::right());

    let totals = compute_totals(cart);

    writeln!(out, "{table}")?;
    writeln!(out, "Subtotal:  {}", format_usd(totals.subtotal))?;
    writeln!(out, "Tax (8%):  {}", format_usd(totals.tax))?;
    writeln!(out, "Total:     {}", format_usd(totals.total))
}

pub(crate) fn write_reminders(out: &mut impl Write, reminders: &[Reminder]) -> io::Result<()> {
    if reminders.is_empty() {
        return writeln!(out, "No reminders set");
    }

    let mut builder = Builder::default();

    builder.push_record([
        "Id",
        "Medication",
        "Dosage",
        "Frequency",
        "Times",
        "Status",
    ]);

    for reminder in reminders {
        builder.push_record([
            reminder.id.to_string(),
            reminder.medication.clone(),
            reminder.dosage.clone(),
            reminder.frequency.clone(),
            reminder.times.to_string(),
            status(reminder).to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")
}

pub(crate) fn write_reminder(
    out: &mut impl Write,
    verb: &str,
    reminder: &Reminder,
) -> io::Result<()> {
    writeln!(
        out,
        "{verb} reminder {} for {} ({}, {}) [{}]",
        reminder.id,
        reminder.medication,
        reminder.dosage,
        reminder.times,
        status(reminder)
    )
}

pub(crate) fn write_badges(out: &mut impl Write, counts: BadgeCounts) -> io::Result<()> {
    writeln!(out, "{counts}")
}

fn status(reminder: &Reminder) -> &'static str {
    if reminder.enabled { "active" } else { "paused" }
}
