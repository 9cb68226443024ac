//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a labeled key/value line (for `signing show` style listings)
    pub fn field(name: &str, value: &str) {
        println!("  {:<14} {}", format!("{}:", name).dimmed(), value);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.len()));
    }
}

/// Mask a secret for display, keeping only its length visible
pub fn mask_secret(value: &str) -> String {
    "•".repeat(value.chars().count().max(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret_hides_content() {
        let masked = mask_secret("hunter2");
        assert!(!masked.contains("hunter"));
        assert_eq!(masked.chars().count(), 7);
    }

    #[test]
    fn test_mask_secret_pads_short_values() {
        assert_eq!(mask_secret("ab").chars().count(), 4);
    }
}
