//! Hookwire - typed webhook ingestion and handler dispatch
//!
//! Receives event notifications from a device-management platform, turns
//! them into validated [`Event`]s and runs every handler registered for the
//! event's type, isolating handler failures from one another.
//!
//! ```rust,ignore
//! use hookwire::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     hookwire::log::init();
//!
//!     let config = HookwireConfig::load("hookwire.toml")?;
//!     let mut builder = WebhookReceiver::builder()
//!         .schemas(config.schema_registry()?)
//!         .config(config.dispatch_config());
//!     for source in config.handler_sources() {
//!         builder = builder.load_handlers(&source);
//!     }
//!     let receiver = builder.build();
//!
//!     let report = receiver.receive_envelope(&body).await?;
//!     println!("{}", report.status);
//!     Ok(())
//! }
//! ```

pub use hookwire_dispatch as dispatch;
pub use hookwire_events as events;

#[cfg(feature = "config")]
pub use hookwire_config as config;

#[cfg(feature = "log")]
pub use hookwire_log as log;

pub use async_trait::async_trait;

pub use hookwire_events::{
    Event, EventTag, FieldKind, FieldSchema, FieldSpec, FixtureLoadError, FixtureStore,
    ParseError, Parser, SchemaRegistry, WebhookInfo,
};

pub use hookwire_dispatch::{
    CancellationToken, CommandHandler, DirectorySource, DispatchConfig, DispatchReport,
    DispatchState, DispatchStatus, Dispatcher, EventHandler, HandlerError, HandlerExecutionError,
    HandlerLoadError, HandlerOutcome, HandlerRegistry, HandlerResult, HandlerSource,
    ReceiverBuilder, StaticSource, TimeoutPolicy, WebhookReceiver, handler_fn,
};

#[cfg(feature = "config")]
pub use hookwire_config::{ConfigError, HookwireConfig, SchemaTable};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        DispatchConfig, DispatchReport, DispatchStatus, Event, EventHandler, EventTag,
        HandlerError, HandlerRegistry, ParseError, Parser, SchemaRegistry, StaticSource,
        TimeoutPolicy, WebhookReceiver, async_trait, handler_fn,
    };

    #[cfg(feature = "config")]
    pub use crate::HookwireConfig;
}
