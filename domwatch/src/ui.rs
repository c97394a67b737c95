//! Text-mode display logic for the domwatch CLI.
//!
//! Colored result lines and the batch summary. Uses only the `console` crate.

use console::style;
use domwatch_lib::{Availability, DomainResult};
use std::time::Duration;

/// Print one result; failed checks go to stderr.
pub fn print_result(result: &DomainResult) {
    match result.status {
        Availability::Unknown => eprintln!("{}", result_line(result)),
        _ => println!("{}", result_line(result)),
    }
}

/// Render one result as a single line.
pub fn result_line(result: &DomainResult) -> String {
    let name = format!("'{}'", result.domain);
    match result.status {
        Availability::Available => {
            format!("{} is {}", name, style("AVAILABLE").green().bold())
        }
        Availability::Indeterminate => format!(
            "{} is {}  {}",
            name,
            style("AVAILABLE").green().bold(),
            style("(no nameserver answered)").yellow(),
        ),
        Availability::Registered => {
            format!("{} is {}", name, style("NOT available").red().bold())
        }
        Availability::Unknown => format!(
            "Error: {}: {}",
            name,
            result.error_message.as_deref().unwrap_or("unknown failure"),
        ),
    }
}

/// Print the final summary bar with colored counts.
pub fn print_summary(results: &[DomainResult], duration: Duration) {
    println!("  {}", style("─".repeat(52)).dim());
    println!("  {}", summary_line(results, duration));
}

fn summary_line(results: &[DomainResult], duration: Duration) -> String {
    let count = |wanted: &[Availability]| {
        results
            .iter()
            .filter(|r| wanted.contains(&r.status))
            .count()
    };
    let available = count(&[Availability::Available, Availability::Indeterminate]);
    let taken = count(&[Availability::Registered]);
    let unknown = count(&[Availability::Unknown]);
    let total = results.len();

    format!(
        "{} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} taken", taken)).red(),
        style("|").dim(),
        style(format!("{} failed", unknown)).yellow(),
    )
}
