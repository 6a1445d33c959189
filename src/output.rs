//! Colored terminal output.

use colored::Colorize;

/// How a message should be decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Success,
}

/// Decorates a message for the given severity.
///
/// Errors and warnings get a bold colored label (`Error:` / `Warning:`)
/// followed by the bold message. Success messages are bold green as a whole.
pub fn decorate(severity: Severity, message: &str) -> String {
    match severity {
        Severity::Error => format!("{} {}", "Error:".red().bold(), message.bold()),
        Severity::Warning => format!("{} {}", "Warning:".yellow().bold(), message.bold()),
        Severity::Success => message.green().bold().to_string(),
    }
}

pub fn print_error(message: &str) {
    eprintln!("{}", decorate(Severity::Error, message));
}

pub fn print_warning(message: &str) {
    eprintln!("{}", decorate(Severity::Warning, message));
}

pub fn print_success(message: &str) {
    println!("{}", decorate(Severity::Success, message));
}

/// Summary line printed after a complete switch.
pub fn switched_message(project: Option<&str>) -> String {
    match project {
        Some(p) => format!("gcloud and kubectl have been switched to {}", p),
        None => "gcloud and kubectl have been switched".to_string(),
    }
}
