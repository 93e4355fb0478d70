//! Common helpers for console-level tests

use chrono::NaiveDate;
use std::io::Cursor;
use todo_console::{Console, TaskManager, TaskStore};

/// Fixed reference date so due-date phrases are deterministic.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

/// Feed `script` to a console over `manager` and return everything printed.
pub fn run_script(manager: &mut TaskManager, script: &str) -> String {
    colored::control::set_override(false);
    let mut out = Vec::new();
    Console::new(manager)
        .with_clock(fixed_today)
        .run(Cursor::new(script.to_string()), &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

/// Same as `run_script`, saving to `store` after each change.
pub fn run_script_with_store(
    manager: &mut TaskManager,
    store: &mut TaskStore,
    script: &str,
) -> String {
    colored::control::set_override(false);
    let mut out = Vec::new();
    Console::new(manager)
        .with_store(store)
        .with_clock(fixed_today)
        .run(Cursor::new(script.to_string()), &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}
