//! Receive command
//!
//! Runs one payload through the receiver pipeline and prints the report
//! as JSON.

use super::{build_receiver, cancel_on_ctrl_c, parse_tag};
use crate::error::{CliError, CliResult};
use hookwire_config::HookwireConfig;
use hookwire_dispatch::DispatchStatus;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::warn;

pub async fn execute(tag: Option<&str>, file: Option<&Path>, config: &HookwireConfig) -> CliResult<()> {
    let tag = tag.map(parse_tag).transpose()?;

    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };

    let (receiver, load_errors) = build_receiver(config)?;
    for error in &load_errors {
        warn!("{}", error);
    }

    let cancel = cancel_on_ctrl_c();
    let report = match tag {
        Some(tag) => {
            receiver
                .receive_with_cancel(|parser| parser.parse(tag, &raw), &cancel)
                .await?
        }
        None => {
            receiver
                .receive_with_cancel(|parser| parser.parse_envelope(&raw), &cancel)
                .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    match report.status {
        DispatchStatus::AllSucceeded | DispatchStatus::NoHandlers => Ok(()),
        status => Err(CliError::Dispatch(format!("dispatch finished with {}", status))),
    }
}
