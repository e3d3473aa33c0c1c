//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::FilterSpec;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static FILTER: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("🎓").cyan(),
        style("Student Placement & Salary Insights").cyan().bold()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the active source and filters
pub fn print_filter_card(input: &Path, spec: &FilterSpec) {
    let gender = spec.gender.map(|g| g.label()).unwrap_or("All");
    let placement = spec.placement.map(|p| p.label()).unwrap_or("All");

    println!("    {} Source:    {}", FOLDER, style(truncate_path(input, 40)).dim());
    println!(
        "    {} Filters:   Gender={}  Placement={}",
        FILTER,
        style(gender).yellow(),
        style(placement).yellow()
    );
}

/// Print a section header with styling
pub fn print_section_header(title: &str) {
    println!();
    println!("    {} {}", CHART, style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a note that an export was written
pub fn print_saved(path: &Path) {
    println!("    {} Saved to {}", SAVE, style(path.display()).dim());
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    if path_str.chars().count() <= max_len {
        path_str
    } else {
        let tail: String = path_str
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_path_keeps_tail() {
        let truncated = truncate_path(Path::new("/a/very/long/path/to/predictions.csv"), 20);
        assert_eq!(truncated.chars().count(), 20);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with("predictions.csv"));
    }

    #[test]
    fn test_truncate_path_short_unchanged() {
        assert_eq!(truncate_path(Path::new("data.csv"), 20), "data.csv");
    }
}
