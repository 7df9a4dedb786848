//! Fixture check command
//!
//! Parses every sample payload with the configured schemas.

use super::load_fixtures;
use crate::error::{CliError, CliResult};
use crate::output::{failure, info, success, warn};
use hookwire_config::HookwireConfig;
use hookwire_events::{EventTag, Parser};
use std::path::Path;
use std::sync::Arc;

pub fn execute(dir: Option<&Path>, config: &HookwireConfig) -> CliResult<()> {
    let parser = Parser::new(Arc::new(config.schema_registry()?));
    let (store, load_errors, origin) = load_fixtures(dir, config);

    info(&format!("Checking {} fixture(s) from {}", store.len(), origin));
    println!();

    for error in &load_errors {
        failure(&error.to_string());
    }

    let mut parse_failures = 0;
    for (tag, raw) in store.iter() {
        match parser.parse(tag, raw) {
            Ok(event) => success(&format!("{} ({} fields)", tag, event.fields().len())),
            Err(e) => {
                parse_failures += 1;
                failure(&format!("{}: {}", tag, e));
            }
        }
    }

    let missing: Vec<_> = EventTag::ALL
        .iter()
        .filter(|tag| !store.contains(**tag))
        .map(|tag| tag.as_str())
        .collect();
    if !missing.is_empty() {
        println!();
        warn(&format!("No fixture for: {}", missing.join(", ")));
    }

    println!();
    if load_errors.is_empty() && parse_failures == 0 {
        success("All fixtures are valid!");
        Ok(())
    } else {
        Err(CliError::Validation(format!(
            "{} fixture(s) failed to load, {} failed to parse",
            load_errors.len(),
            parse_failures
        )))
    }
}
