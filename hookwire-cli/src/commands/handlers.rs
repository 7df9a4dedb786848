//! Handler listing command

use super::build_receiver;
use crate::error::CliResult;
use crate::output::{info, warn};
use colored::Colorize;
use hookwire_config::HookwireConfig;

pub fn execute(config: &HookwireConfig) -> CliResult<()> {
    if config.handler_dirs.is_empty() {
        warn("No handler directories configured");
        return Ok(());
    }

    for dir in &config.handler_dirs {
        info(&format!("Handler directory: {}", dir.display()));
    }
    println!();

    let (receiver, errors) = build_receiver(config)?;
    let registry = receiver.dispatcher().registry();

    for (tag, handlers) in registry.iter() {
        println!("  {}", tag.to_string().bright_white().bold());
        for handler in handlers {
            println!("    {} {}", "•".cyan(), handler.name());
        }
    }

    println!();
    println!(
        "  {} handler registration(s) across {} event type(s)",
        registry.len(),
        registry.tags().len()
    );

    if !errors.is_empty() {
        println!();
        for error in &errors {
            warn(&error.to_string());
        }
    }

    Ok(())
}
