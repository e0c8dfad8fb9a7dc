//! Terminal output for the headless commands.

use crate::history::HistoryEntry;
use crate::runner::RunOutcome;

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";
pub const GRAY: &str = "\x1b[90m";

pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{YELLOW}Warning:{RESET} {}", msg);
}

pub fn print_info(msg: &str) {
    eprintln!("{CYAN}Info:{RESET} {}", msg);
}

/// Print one line of tool output verbatim.
pub fn print_tool_line(line: &str) {
    println!("{}", line);
}

/// Color used for an outcome in the terminal.
pub fn outcome_color(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Success => GREEN,
        RunOutcome::Failure(_) => RED,
        RunOutcome::ToolNotFound => YELLOW,
    }
}

/// Print the final result line of a headless run.
pub fn print_run_result(entry: &HistoryEntry, status_line: &str) {
    println!("{GRAY}{}{RESET}", "-".repeat(57));
    println!(
        "{}{BOLD}{}{RESET} {GRAY}({}){RESET}",
        outcome_color(entry.outcome),
        entry.title(),
        status_line
    );
}

/// Print a labelled key/value row, as used by `config`.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{BLUE}{:<16}{RESET}{}", format!("{}:", label), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_colors_are_distinct() {
        let success = outcome_color(RunOutcome::Success);
        let failure = outcome_color(RunOutcome::Failure(1));
        let missing = outcome_color(RunOutcome::ToolNotFound);
        assert_ne!(success, failure);
        assert_ne!(failure, missing);
        assert_ne!(success, missing);
    }
}
