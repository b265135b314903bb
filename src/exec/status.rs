// src/exec/status.rs

use std::io::{IsTerminal, Write};

use colored::{ColoredString, Colorize};

/// Build status shown to the user on every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Building,
    Ok,
    Failed,
}

impl Status {
    /// Four-column plain text of the badge.
    pub fn label(self) -> &'static str {
        match self {
            Status::Building => " .. ",
            Status::Ok => " ok ",
            Status::Failed => "!!!!",
        }
    }

    /// The badge, colored unless coloring is switched off globally.
    pub fn badge(self) -> ColoredString {
        let label = self.label().white().bold();
        match self {
            Status::Building => label.on_blue(),
            Status::Ok => label.on_green(),
            Status::Failed => label.on_red(),
        }
    }
}

/// Color badges only when stderr is a terminal. Called once at startup.
pub fn configure_color() {
    colored::control::set_override(std::io::stderr().is_terminal());
}

/// Writes status badges to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLine;

impl StatusLine {
    pub fn new() -> Self {
        Self
    }

    /// Print the in-progress badge without a newline.
    pub fn building(&self) {
        let mut err = std::io::stderr();
        let _ = write!(err, "{}", Status::Building.badge());
        let _ = err.flush();
    }

    /// Erase the in-progress badge and report success.
    pub fn succeeded(&self, word: &str) {
        let erase = "\u{8}".repeat(4);
        eprintln!("{erase}{} {word}", Status::Ok.badge());
    }

    pub fn failed(&self, message: &str) {
        eprintln!("{} {message}", Status::Failed.badge());
    }
}
