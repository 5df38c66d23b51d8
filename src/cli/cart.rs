use std::{io::Write, num::NonZeroUsize, path::PathBuf};

use clap::{Args, Subcommand};
use medicart::{
    context::AppContext,
    domain::carts::models::CartItem,
    prescriptions::{PrescriptionReader, PrescriptionUpload, SimulatedPrescriptionReader},
};
use rust_decimal::Decimal;

use super::{describe, output_error, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// List the cart with totals
    List,
    /// Read a prescription file and add the medications found in it
    Upload(UploadArgs),
    /// Add a medication by hand
    Add(AddArgs),
    /// Change the quantity at a cart position
    Qty(QtyArgs),
    /// Remove the item at a cart position
    Remove(PositionArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct UploadArgs {
    /// Prescription image or PDF
    file: PathBuf,

    /// Seed for the simulated reader
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Medication name
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    dosage: String,

    #[arg(long, default_value = "")]
    frequency: String,

    #[arg(long, default_value = "")]
    duration: String,

    /// Unit price in dollars
    #[arg(long)]
    price: Decimal,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct QtyArgs {
    /// Cart position, starting at 1
    position: NonZeroUsize,

    /// Amount to add, negative to subtract
    #[arg(allow_negative_numbers = true)]
    delta: i64,
}

#[derive(Debug, Args)]
struct PositionArgs {
    /// Cart position, starting at 1
    position: NonZeroUsize,
}

fn index(position: NonZeroUsize) -> usize {
    position.get() - 1
}

pub(crate) fn run(
    command: CartCommand,
    app: &AppContext,
    out: &mut impl Write,
) -> Result<(), String> {
    let view = app.mount_cart_view();

    match command.command {
        CartSubcommand::List => {}
        CartSubcommand::Upload(args) => {
            let upload = PrescriptionUpload::from_path(&args.file)
                .map_err(|error| describe("failed to read prescription", &error))?;

            let reader = match args.seed {
                Some(seed) => SimulatedPrescriptionReader::with_seed(seed),
                None => SimulatedPrescriptionReader::new(),
            }
            .map_err(|error| describe("failed to load reader", &error))?;

            let found = reader
                .read(&upload)
                .map_err(|error| describe("failed to read prescription", &error))?;
            let total = found.len();

            let added = app
                .carts
                .add_medications(found)
                .map_err(|error| describe("failed to add medications", &error))?;

            writeln!(
                out,
                "Found {total} medication(s) in {}, added {added} to the cart",
                upload.file_name
            )
            .map_err(output_error)?;
        }
        CartSubcommand::Add(args) => {
            let added = app
                .carts
                .add_medications(vec![CartItem {
                    name: args.name,
                    dosage: args.dosage,
                    frequency: args.frequency,
                    duration: args.duration,
                    price: args.price,
                    quantity: args.quantity,
                }])
                .map_err(|error| describe("failed to add medication", &error))?;

            if added == 0 {
                writeln!(out, "Already in the cart").map_err(output_error)?;
            }
        }
        CartSubcommand::Qty(args) => app
            .carts
            .update_quantity(index(args.position), args.delta)
            .map_err(|error| describe("failed to update quantity", &error))?,
        CartSubcommand::Remove(args) => {
            let removed = app
                .carts
                .remove_item(index(args.position))
                .map_err(|error| describe("failed to remove item", &error))?;

            if let Some(item) = removed {
                writeln!(out, "Removed {}", item.name).map_err(output_error)?;
            }
        }
        CartSubcommand::Clear => app
            .carts
            .clear()
            .map_err(|error| describe("failed to clear cart", &error))?,
    }

    render::write_cart(out, &view.records()).map_err(output_error)
}
