//! Shared terminal output helpers: spinners, tables, time and error display.

use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use larder_types::error::AuthoringError;
use larder_types::recipe::IngredientAddition;

/// Spinner shown while a gateway call is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Table with the condensed UTF-8 preset and white header cells.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// "2.5 gm Onion", or "Onion x 3" when there are no units.
pub fn format_addition(addition: &IngredientAddition) -> String {
    match &addition.units {
        Some(units) => format!("{} {} {}", addition.quantity, units, addition.name),
        None => format!("{} x {}", addition.name, addition.quantity),
    }
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

pub fn success(message: &str) {
    println!("  {} {}", style("✓").green().bold(), message);
}

pub fn warn(message: &str) {
    println!("  {} {}", style("!").yellow().bold(), message);
}

/// Print an authoring error the way the author should see it.
///
/// Validation failures list every violated field. Gateway failures show the
/// friendly message with the technical reason dimmed underneath.
pub fn report_error(err: &AuthoringError) {
    match err {
        AuthoringError::Validation(validation) => {
            println!("  {} Not ready yet:", style("✗").red().bold());
            for violation in &validation.violations {
                println!(
                    "    {} {}",
                    style(format!("{}:", violation.field)).yellow(),
                    violation.message
                );
            }
        }
        AuthoringError::Persistence(persistence) => {
            println!(
                "  {} {}",
                style("✗").red().bold(),
                capitalize(persistence.user_message())
            );
            println!("    {}", style(persistence.to_string()).dim());
        }
        other => {
            println!("  {} {}", style("✗").red().bold(), capitalize(&other.to_string()));
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
