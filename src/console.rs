//! Console I/O seam used by the menu controller.
//!
//! Screen clearing and pause-for-keypress are OS-level conveniences; from the
//! core's perspective they are no-ops and the scripted test console treats
//! them as such.

use std::io::{self, BufRead, Write};
use std::process::Command;

use crate::render::LINE_LENGTH;

/// Line-based terminal collaborator.
pub trait Console {
    /// Prompts and reads one line; `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
    /// Writes one line of output.
    fn print(&mut self, text: &str);
    /// Writes one line centered within the fixed screen width.
    fn print_centered(&mut self, text: &str);
    /// Clears the screen.
    fn clear(&mut self);
    /// Waits for the user to acknowledge before continuing.
    fn pause(&mut self);
}

/// Console backed by stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if !prompt.is_empty() {
            print!("{prompt}");
            let _ = io::stdout().flush();
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn print_centered(&mut self, text: &str) {
        println!("{:^width$}", text, width = LINE_LENGTH);
    }

    fn clear(&mut self) {
        let status = if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "cls"]).status()
        } else {
            Command::new("clear").status()
        };
        if status.is_err() {
            // Fall back to a form feed when no shell utility is available.
            print!("\x0c");
            let _ = io::stdout().flush();
        }
    }

    fn pause(&mut self) {
        let _ = self.read_line("Press enter to continue . . . ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_width_matches_line_length() {
        let centered = format!("{:^width$}", "NO RESULTS", width = LINE_LENGTH);
        assert_eq!(centered.chars().count(), LINE_LENGTH);
    }
}
