//! Handler trait and closure adapter

use crate::error::HandlerError;
use async_trait::async_trait;
use hookwire_events::Event;
use std::time::Duration;

/// Logic invoked for every dispatched event of the tags it is registered for
///
/// # Examples
///
/// ```rust,ignore
/// struct AuditHandler;
///
/// #[async_trait]
/// impl EventHandler for AuditHandler {
///     fn name(&self) -> &str {
///         "audit"
///     }
///
///     async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
///         println!("{} from {:?}", event.tag(), event.field_str("udid"));
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Identity used in logs and dispatch reports
    fn name(&self) -> &str;

    /// Handle one event
    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;

    /// Time limit overriding the dispatcher default
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

/// Handler backed by a synchronous closure
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        (self.f)(event)
    }
}

/// Wrap a closure as a named handler
pub fn handler_fn<F>(name: impl Into<String>, f: F) -> FnHandler<F>
where
    F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync,
{
    FnHandler::new(name, f)
}
