//! Screen composition and execution.

mod runner;

pub use runner::{load_tables, run_screen, AliasConfig, Screen, ScreenConfig, ScreenOutcome};
