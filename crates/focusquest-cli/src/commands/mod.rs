pub mod chat;
pub mod completions;
pub mod config;
pub mod goal;
pub mod prefs;
pub mod stats;
pub mod task;
pub mod timer;

use chrono::{Local, NaiveDate};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Activity is bucketed by the local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report a lookup miss on stderr and exit non-zero.
pub fn not_found(kind: &str, id: &str) -> ! {
    eprintln!("{kind} not found: {id}");
    std::process::exit(1);
}
