//! Processes sharing a data directory behave like tabs sharing storage.

use medicart::{
    context::AppContext,
    counters::BadgeCounts,
    domain::{carts::models::CartItem, reminders::models::NewReminder},
    storage::{CART_KEY, REMINDERS_KEY},
};
use rust_decimal::Decimal;
use tempfile::tempdir;
use testresult::TestResult;

fn item(name: &str) -> CartItem {
    CartItem {
        name: name.to_string(),
        dosage: "10mg".to_string(),
        frequency: "Take once daily".to_string(),
        duration: "90 days".to_string(),
        price: Decimal::new(1599, 2),
        quantity: 1,
    }
}

#[test]
fn writes_in_one_tab_reach_another_through_the_watcher() -> TestResult {
    let dir = tempdir()?;
    let (tab_a, storage_a) = AppContext::from_data_dir(dir.path())?;
    let (tab_b, _) = AppContext::from_data_dir(dir.path())?;

    let badges_a = tab_a.mount_badges();
    let cart_view_a = tab_a.mount_cart_view();
    let mut watcher = storage_a.watch(&[CART_KEY, REMINDERS_KEY]);

    tab_b.carts.add_medications(vec![item("Lisinopril")])?;
    tab_b.reminders.create_from_cart(&tab_b.carts.items())?;

    assert!(cart_view_a.is_empty(), "tab A is stale until the signal arrives");

    for event in watcher.poll() {
        tab_a.bus.relay_storage_event(&event);
    }

    assert_eq!(cart_view_a.records(), tab_b.carts.items());
    assert_eq!(
        badges_a.counts(),
        BadgeCounts {
            cart: 1,
            reminders: 1
        }
    );

    Ok(())
}

#[test]
fn last_write_wins_across_tabs() -> TestResult {
    let dir = tempdir()?;
    let (tab_a, _) = AppContext::from_data_dir(dir.path())?;
    let (tab_b, _) = AppContext::from_data_dir(dir.path())?;

    tab_a.carts.add_medications(vec![item("A")])?;
    let stale_b = tab_b.carts.items();

    tab_a.carts.add_medications(vec![item("B")])?;

    let mut replacement = stale_b;
    replacement.push(item("C"));
    tab_b.carts.replace_cart(replacement)?;

    let names: Vec<String> = tab_a.carts.items().into_iter().map(|i| i.name).collect();

    assert_eq!(names, vec!["A", "C"]);

    Ok(())
}

#[test]
fn reminders_persist_across_reopen() -> TestResult {
    let dir = tempdir()?;

    let created = {
        let (tab, _) = AppContext::from_data_dir(dir.path())?;
        tab.reminders.create(NewReminder {
            medication: "Amoxicillin".to_string(),
            dosage: "500mg".to_string(),
            ..NewReminder::default()
        })?
    };

    let (reopened, _) = AppContext::from_data_dir(dir.path())?;

    assert_eq!(reopened.reminders.reminders(), vec![created]);

    Ok(())
}
