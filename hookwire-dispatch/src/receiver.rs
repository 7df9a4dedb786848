//! Webhook receiver for incoming notifications

use crate::config::DispatchConfig;
use crate::dispatcher::Dispatcher;
use crate::error::HandlerLoadError;
use crate::handler::EventHandler;
use crate::registry::HandlerRegistry;
use crate::report::DispatchReport;
use crate::source::HandlerSource;
use hookwire_events::{Event, EventTag, ParseError, Parser, SchemaRegistry};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Where a notification is in its lifecycle.
///
/// `Received -> Parsed -> Dispatching -> Completed`, or `Received ->
/// Rejected` when parsing fails. Rejected notifications never reach a
/// handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Received,
    Parsed,
    Dispatching,
    Completed,
    Rejected,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Self::Received => "received",
            Self::Parsed => "parsed",
            Self::Dispatching => "dispatching",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        };
        f.write_str(state)
    }
}

/// Parses incoming notifications and dispatches them to handlers
#[derive(Clone)]
pub struct WebhookReceiver {
    parser: Parser,
    dispatcher: Dispatcher,
}

impl WebhookReceiver {
    /// Create a receiver from a parser and dispatcher
    pub fn new(parser: Parser, dispatcher: Dispatcher) -> Self {
        Self { parser, dispatcher }
    }

    /// Create a builder
    pub fn builder() -> ReceiverBuilder {
        ReceiverBuilder::new()
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Parse a payload for a known tag and dispatch it
    pub async fn receive(&self, tag: EventTag, raw: &str) -> Result<DispatchReport, ParseError> {
        self.receive_with_cancel(|parser| parser.parse(tag, raw), &CancellationToken::new())
            .await
    }

    /// Same as [`receive`](Self::receive) with the tag given by name
    pub async fn receive_named(&self, tag: &str, raw: &str) -> Result<DispatchReport, ParseError> {
        self.receive_with_cancel(
            |parser| parser.parse_str_tag(tag, raw),
            &CancellationToken::new(),
        )
        .await
    }

    /// Read the tag from the payload's own `webhook.webhookEvent` and dispatch
    pub async fn receive_envelope(&self, raw: &str) -> Result<DispatchReport, ParseError> {
        self.receive_with_cancel(|parser| parser.parse_envelope(raw), &CancellationToken::new())
            .await
    }

    /// Run the full pipeline, letting `cancel` stop dispatch early.
    ///
    /// `parse` picks which [`Parser`] entry point turns the payload into an
    /// event.
    pub async fn receive_with_cancel<P>(
        &self,
        parse: P,
        cancel: &CancellationToken,
    ) -> Result<DispatchReport, ParseError>
    where
        P: FnOnce(&Parser) -> Result<Event, ParseError>,
    {
        debug!(state = %DispatchState::Received, "Webhook received");

        let event = match parse(&self.parser) {
            Ok(event) => event,
            Err(e) => {
                warn!(state = %DispatchState::Rejected, "Webhook rejected: {}", e);
                return Err(e);
            }
        };

        debug!(
            state = %DispatchState::Parsed,
            tag = %event.tag(),
            event_id = %event.id(),
            "Webhook parsed"
        );
        debug!(state = %DispatchState::Dispatching, event_id = %event.id(), "Webhook dispatching");

        let report = self.dispatcher.dispatch_with_cancel(&event, cancel).await;

        debug!(
            state = %DispatchState::Completed,
            event_id = %event.id(),
            status = %report.status,
            "Webhook completed"
        );

        Ok(report)
    }
}

/// Builder for [`WebhookReceiver`].
///
/// Everything mutable lives here; `build` freezes the schemas and handlers
/// behind `Arc`s so the receiver can be cloned into concurrent tasks.
pub struct ReceiverBuilder {
    schemas: SchemaRegistry,
    registry: HandlerRegistry,
    config: DispatchConfig,
    load_errors: Vec<HandlerLoadError>,
}

impl ReceiverBuilder {
    /// Start from the built-in schemas and no handlers
    pub fn new() -> Self {
        Self {
            schemas: SchemaRegistry::builtin(),
            registry: HandlerRegistry::new(),
            config: DispatchConfig::default(),
            load_errors: Vec::new(),
        }
    }

    /// Replace the schema registry
    pub fn schemas(mut self, schemas: SchemaRegistry) -> Self {
        self.schemas = schemas;
        self
    }

    /// Mutable access to the schemas before they are frozen
    pub fn schemas_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.schemas
    }

    /// Register a handler for a tag
    pub fn register<H>(mut self, tag: EventTag, handler: H) -> Self
    where
        H: EventHandler + 'static,
    {
        self.registry.register(tag, handler);
        self
    }

    /// Register a handler for several tags
    pub fn register_many<I, H>(mut self, tags: I, handler: H) -> Self
    where
        I: IntoIterator<Item = EventTag>,
        H: EventHandler + 'static,
    {
        let handler: Arc<dyn EventHandler> = Arc::new(handler);
        for tag in tags {
            self.registry.register_arc(tag, handler.clone());
        }
        self
    }

    /// Load handlers from a source; failures are kept for [`load_errors`](Self::load_errors)
    pub fn load_handlers(mut self, source: &dyn HandlerSource) -> Self {
        let errors = self.registry.load_handlers(source);
        self.load_errors.extend(errors);
        self
    }

    /// Set the dispatch configuration
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Handler definitions that failed to load so far
    pub fn load_errors(&self) -> &[HandlerLoadError] {
        &self.load_errors
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Freeze the registries and create the receiver
    pub fn build(self) -> WebhookReceiver {
        let parser = Parser::new(Arc::new(self.schemas));
        let dispatcher = Dispatcher::with_config(Arc::new(self.registry), self.config);
        WebhookReceiver::new(parser, dispatcher)
    }
}

impl Default for ReceiverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
