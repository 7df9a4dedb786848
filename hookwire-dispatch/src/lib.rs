//! Handler registry and dispatch for Hookwire
//!
//! This crate routes parsed webhook events to the handlers registered for
//! their tag and reports what each handler did.
//!
//! ## Features
//!
//! - **Registry** - ordered handlers per event tag, frozen after startup
//! - **Sources** - handlers from code or from a directory of executables
//!   and TOML manifests
//! - **Isolation** - failures, panics and timeouts stay with the handler
//!   that caused them
//! - **Cancellation** - stop a dispatch cleanly with a [`CancellationToken`]
//! - **Receiver** - parse, validate and dispatch in one call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hookwire_dispatch::*;
//! use hookwire_events::{Event, EventTag};
//!
//! #[tokio::main]
//! async fn main() {
//!     let receiver = WebhookReceiver::builder()
//!         .register(
//!             EventTag::ComputerCheckIn,
//!             handler_fn("log-checkin", |event: &Event| {
//!                 println!("check-in from {:?}", event.field_str("computer.udid"));
//!                 Ok(())
//!             }),
//!         )
//!         .build();
//!
//!     let report = receiver
//!         .receive_named("ComputerCheckIn", payload)
//!         .await?;
//!     println!("{}", report.status);
//! }
//! ```
//!
//! ## Handler Directories
//!
//! ```rust,ignore
//! // ComputerAdded-notify.sh runs for ComputerAdded events,
//! // inventory.toml names its own events and command
//! let receiver = WebhookReceiver::builder()
//!     .load_handlers(&DirectorySource::new("/etc/hookwire/handlers"))
//!     .build();
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! let config = DispatchConfig::builder()
//!     .handler_timeout_secs(30)
//!     .timeout_policy(TimeoutPolicy::Abort)
//!     .build();
//! ```

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod receiver;
pub mod registry;
pub mod report;
pub mod source;

pub use command::CommandHandler;
pub use config::{DispatchConfig, DispatchConfigBuilder, TimeoutPolicy};
pub use dispatcher::Dispatcher;
pub use error::{HandlerError, HandlerExecutionError, HandlerLoadError};
pub use handler::{EventHandler, FnHandler, handler_fn};
pub use receiver::{DispatchState, ReceiverBuilder, WebhookReceiver};
pub use registry::HandlerRegistry;
pub use report::{DispatchReport, DispatchStatus, HandlerOutcome, HandlerResult};
pub use source::{DirectorySource, DiscoveredHandler, Discovery, HandlerManifest, HandlerSource, StaticSource};
pub use tokio_util::sync::CancellationToken;
