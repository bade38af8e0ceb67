//! Terminal output helpers for the command-line binary.
//!
//! Colored status lines, a spinner for long-running stages, and small
//! formatting helpers for the run summary.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{NormalizedRecord, ResultSet, SourceKind};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Icon shown next to a source name.
pub fn source_icon(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Reddit => "👽",
        SourceKind::HackerNews => "📰",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Warning => "⚠",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print the first `limit` records of a result set, one line each.
pub fn print_preview(result_set: &ResultSet, limit: usize) {
    for record in result_set.iter().take(limit) {
        match record {
            NormalizedRecord::Discussion(r) => println!(
                "  {} {}  {}",
                format!("r/{}", r.subreddit).green(),
                truncate_with_ellipsis(&r.title, 40).bold(),
                truncate_with_ellipsis(&r.comment, 50).dimmed()
            ),
            NormalizedRecord::News(r) => println!(
                "  {}  {}",
                truncate_with_ellipsis(&r.title, 60).bold(),
                r.author.yellow()
            ),
        }
    }

    let remaining = result_set.len().saturating_sub(limit);
    if remaining > 0 {
        println!("  {}", format!("… and {} more", format_number(remaining)).dimmed());
    }
}

/// Format a number with commas.
pub fn format_number(n: usize) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Truncate text to fit within the specified display width.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    let text = text.lines().next().unwrap_or_default();
    if max_width <= 3 {
        return "...".to_string();
    }

    let total_width = unicode_width::UnicodeWidthStr::width(text);
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + w > max_width - 3 {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Get a human-readable file size.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn spinner_style(template: &str, ticks: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
        .tick_chars(ticks)
}

/// A loading spinner with a message.
///
/// Hidden when stdout is not a terminal or output is quiet.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str, visible: bool) -> Self {
        let pb = if visible && is_terminal() {
            indicatif::ProgressBar::new_spinner()
        } else {
            indicatif::ProgressBar::hidden()
        };
        pb.set_style(spinner_style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.green} {msg}", "✓✓"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.red} {msg}", "✗✗"));
        self.pb.finish_with_message(msg.to_string());
    }
}
