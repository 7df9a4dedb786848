//! CLI command implementations.

pub mod fixtures;
pub mod handlers;
pub mod receive;

use crate::error::CliResult;
use hookwire_config::HookwireConfig;
use hookwire_dispatch::{CancellationToken, HandlerLoadError, WebhookReceiver};
use hookwire_events::{EventTag, FixtureLoadError, FixtureStore};
use std::path::Path;
use tracing::debug;

/// Load the configuration file, or fall back to the environment alone
pub fn load_config(path: Option<&Path>) -> CliResult<HookwireConfig> {
    let config = match path {
        Some(path) => HookwireConfig::load(path)?,
        None => HookwireConfig::from_env()?,
    };
    debug!(?config, "Resolved configuration");
    Ok(config)
}

/// Build a receiver from the configured schemas, handler directories and
/// dispatch settings
pub fn build_receiver(
    config: &HookwireConfig,
) -> CliResult<(WebhookReceiver, Vec<HandlerLoadError>)> {
    let mut builder = WebhookReceiver::builder()
        .schemas(config.schema_registry()?)
        .config(config.dispatch_config());

    for source in config.handler_sources() {
        builder = builder.load_handlers(&source);
    }

    let errors = builder.load_errors().to_vec();
    Ok((builder.build(), errors))
}

/// Fixtures from `dir`, else the configured directory, else the embedded
/// samples
pub fn load_fixtures(
    dir: Option<&Path>,
    config: &HookwireConfig,
) -> (FixtureStore, Vec<FixtureLoadError>, String) {
    match dir.or(config.fixture_dir.as_deref()) {
        Some(dir) => {
            let (store, errors) = FixtureStore::load_all(dir);
            (store, errors, dir.display().to_string())
        }
        None => (FixtureStore::embedded(), Vec::new(), "embedded samples".to_string()),
    }
}

pub fn parse_tag(name: &str) -> CliResult<EventTag> {
    name.parse::<EventTag>().map_err(|e| {
        crate::error::CliError::InvalidArgument(format!(
            "{} (known types: {})",
            e,
            EventTag::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

/// Token cancelled on Ctrl-C
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}
