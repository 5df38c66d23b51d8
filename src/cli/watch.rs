use std::{cell::RefCell, io::Write, rc::Rc, thread, time::Duration};

use clap::Args;
use medicart::{
    context::AppContext,
    storage::{CART_KEY, FileStorage, REMINDERS_KEY},
};
use tracing::debug;

use super::{output_error, render};

#[derive(Debug, Args)]
pub(crate) struct WatchArgs {
    /// Polling interval in milliseconds
    #[arg(long, env = "MEDICART_WATCH_INTERVAL_MS", default_value_t = 500)]
    interval_ms: u64,

    /// Stop after this many polls
    #[arg(long)]
    max_polls: Option<u64>,
}

pub(crate) fn run(
    args: &WatchArgs,
    app: &AppContext,
    storage: &FileStorage,
    out: &mut impl Write,
) -> Result<(), String> {
    let badges = app.mount_badges();
    let mut watcher = storage.watch(&[CART_KEY, REMINDERS_KEY]);

    let pending = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&pending);
    badges.on_change(move |counts| sink.borrow_mut().push(counts));

    render::write_badges(out, badges.counts()).map_err(output_error)?;
    out.flush().map_err(output_error)?;

    let interval = Duration::from_millis(args.interval_ms);
    let mut polls = 0_u64;

    debug!(
        dir = %storage.dir().display(),
        interval_ms = args.interval_ms,
        "watching storage"
    );

    while args.max_polls.is_none_or(|max| polls < max) {
        thread::sleep(interval);

        for event in watcher.poll() {
            app.bus.relay_storage_event(&event);
        }

        for counts in pending.borrow_mut().drain(..) {
            render::write_badges(out, counts).map_err(output_error)?;
        }
        out.flush().map_err(output_error)?;

        polls += 1;
    }

    Ok(())
}
