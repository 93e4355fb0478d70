//! Interactive task tracker: an owned in-memory task collection driven by a
//! line-oriented console, with optional SQLite persistence.

pub mod cli;
pub mod commands;
pub mod console;
pub mod database;
pub mod dates;
pub mod display;
pub mod help;
pub mod manager;
pub mod types;
pub mod utils;

pub use console::Console;
pub use database::TaskStore;
pub use manager::{Completion, TaskManager};
pub use types::*;
