//! CLI output formatting module
//!
//! Provides progress bars, table formatters, and the human/JSON output
//! switch shared by every command.

pub mod progress;
pub mod table;

pub use progress::{create_progress_bar, create_spinner, ProgressBarExt};
pub use table::TableFormatter;

use serde::Serialize;

/// Result payload a command can render as human-readable text or JSON
pub trait CommandOutput: Serialize {
    /// Render the payload for a terminal
    fn to_human(&self) -> String;

    /// Render the payload as a JSON value
    fn to_json(&self) -> serde_json::Value;
}

/// Print a command result in the requested format
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}
