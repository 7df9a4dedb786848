//! Terminal output helpers.

use colored::Colorize;
use hookwire_dispatch::{DispatchReport, DispatchStatus, HandlerResult};

pub fn print_mini_banner() {
    println!(
        "\n  {} {} {}\n",
        "⚡".bright_yellow(),
        "Hookwire".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

pub fn success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn failure(msg: &str) {
    println!("  {} {}", "✗".red().bold(), msg.red());
}

pub fn warn(msg: &str) {
    println!("  {} {}", "⚠".yellow().bold(), msg.yellow());
}

pub fn info(msg: &str) {
    println!("  {} {}", "→".cyan(), msg);
}

/// Print one line per handler and a status line.
pub fn print_report(report: &DispatchReport) {
    for outcome in &report.outcomes {
        let elapsed = format!("({}ms)", outcome.elapsed.as_millis()).dimmed();
        match &outcome.result {
            HandlerResult::Succeeded => {
                println!("  {} {} {}", "✓".green().bold(), outcome.handler, elapsed)
            }
            HandlerResult::Failed(e) => println!(
                "  {} {} {} {}",
                "✗".red().bold(),
                outcome.handler,
                e.cause.to_string().red(),
                elapsed
            ),
            HandlerResult::Skipped => {
                println!("  {} {} {}", "○".dimmed(), outcome.handler, "skipped".dimmed())
            }
        }
    }

    println!();
    let summary = format!(
        "{} {}: {} invoked, {} failed",
        report.tag, report.status, report.invoked, report.failed()
    );
    match report.status {
        DispatchStatus::AllSucceeded => success(&summary),
        DispatchStatus::NoHandlers => warn(&summary),
        DispatchStatus::PartialFailure | DispatchStatus::Cancelled => failure(&summary),
    }
}
