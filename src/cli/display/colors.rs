//! Color mapping for policy labels.
//!
//! `console` disables styling automatically when stdout is not a terminal.

use console::{style, StyledObject};

/// High = red bold, Medium = yellow, Low = dim.
pub fn colorize_priority(priority: &str) -> StyledObject<&str> {
    match priority.to_lowercase().as_str() {
        "high" => style(priority).red().bold(),
        "medium" => style(priority).yellow(),
        "low" => style(priority).dim(),
        _ => style(priority),
    }
}

/// Enabled = green, disabled = dim.
pub fn colorize_enabled(enabled: bool) -> StyledObject<&'static str> {
    if enabled {
        style("enabled").green()
    } else {
        style("disabled").dim()
    }
}

/// Green check for valid, red cross for invalid.
pub fn colorize_valid(valid: bool) -> StyledObject<&'static str> {
    if valid {
        style("valid").green().bold()
    } else {
        style("invalid").red().bold()
    }
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", style(name).bold(), style(":").dim())
}
