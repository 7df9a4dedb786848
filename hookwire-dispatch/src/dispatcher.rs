//! Event dispatcher

use crate::config::{DispatchConfig, TimeoutPolicy};
use crate::error::{HandlerError, HandlerExecutionError};
use crate::handler::EventHandler;
use crate::registry::HandlerRegistry;
use crate::report::{DispatchReport, HandlerOutcome, HandlerResult};
use futures::FutureExt;
use hookwire_events::Event;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Routes parsed events to their registered handlers.
///
/// Handlers for one event run one after another in registration order. A
/// failing, panicking or timed out handler is recorded in the report and
/// never stops the handlers after it, unless the timeout policy is
/// [`TimeoutPolicy::Abort`] or the dispatch is cancelled.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    config: Arc<DispatchConfig>,
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    /// Create a dispatcher with custom config
    pub fn with_config(registry: Arc<HandlerRegistry>, config: DispatchConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatch an event to every handler registered for its tag
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let dispatcher = Dispatcher::new(Arc::new(registry));
    /// let report = dispatcher.dispatch(&event).await;
    ///
    /// for failure in report.errors() {
    ///     eprintln!("{}", failure);
    /// }
    /// ```
    pub async fn dispatch(&self, event: &Event) -> DispatchReport {
        self.dispatch_with_cancel(event, &CancellationToken::new())
            .await
    }

    /// Dispatch an event, stopping early when `cancel` fires.
    ///
    /// The handler running at that moment is dropped and recorded as
    /// cancelled; the rest are recorded as skipped.
    pub async fn dispatch_with_cancel(
        &self,
        event: &Event,
        cancel: &CancellationToken,
    ) -> DispatchReport {
        let handlers = self.registry.handlers_for(event.tag());
        let mut report = DispatchReport::new(event);

        if handlers.is_empty() {
            debug!(tag = %event.tag(), event_id = %event.id(), "No handlers registered for event");
            return report.finish(false);
        }

        info!(
            tag = %event.tag(),
            event_id = %event.id(),
            handlers = handlers.len(),
            "Dispatching event"
        );

        let mut halted = false;
        let mut cancelled = false;

        for handler in handlers {
            let name = handler.name().to_string();

            if halted {
                report.record(HandlerOutcome {
                    handler: name,
                    result: HandlerResult::Skipped,
                    elapsed: Default::default(),
                });
                continue;
            }

            let started = Instant::now();
            let result = self.invoke(handler.as_ref(), event, cancel).await;
            let elapsed = started.elapsed();

            let result = match result {
                Ok(()) => {
                    debug!(handler = %name, elapsed_ms = elapsed.as_millis() as u64, "Handler succeeded");
                    HandlerResult::Succeeded
                }
                Err(cause) => {
                    error!(handler = %name, tag = %event.tag(), "Handler failed: {}", cause);

                    match cause {
                        HandlerError::Cancelled => {
                            halted = true;
                            cancelled = true;
                        }
                        HandlerError::TimedOut(_)
                            if self.config.timeout_policy == TimeoutPolicy::Abort =>
                        {
                            warn!(handler = %name, "Aborting dispatch after handler timeout");
                            halted = true;
                        }
                        _ => {}
                    }

                    HandlerResult::Failed(HandlerExecutionError {
                        handler: name.clone(),
                        cause,
                    })
                }
            };

            report.record(HandlerOutcome {
                handler: name,
                result,
                elapsed,
            });
        }

        let report = report.finish(cancelled);
        info!(
            tag = %event.tag(),
            event_id = %event.id(),
            status = %report.status,
            invoked = report.invoked,
            "Dispatch completed"
        );
        report
    }

    async fn invoke(
        &self,
        handler: &dyn EventHandler,
        event: &Event,
        cancel: &CancellationToken,
    ) -> Result<(), HandlerError> {
        if cancel.is_cancelled() {
            return Err(HandlerError::Cancelled);
        }

        let limit = handler.timeout().or(self.config.handler_timeout);
        let call = AssertUnwindSafe(handler.handle(event)).catch_unwind();

        let run = async move {
            let outcome = match limit {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(outcome) => outcome,
                    Err(_) => return Err(HandlerError::TimedOut(limit)),
                },
                None => call.await,
            };

            match outcome {
                Ok(result) => result,
                Err(panic) => Err(HandlerError::Panicked(panic_message(panic.as_ref()))),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(HandlerError::Cancelled),
            result = run => result,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
