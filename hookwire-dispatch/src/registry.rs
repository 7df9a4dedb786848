//! Handler registry

use crate::error::HandlerLoadError;
use crate::handler::EventHandler;
use crate::source::HandlerSource;
use hookwire_events::EventTag;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ordered handlers per event tag.
///
/// Filled during startup, then frozen by moving it into the
/// [`Dispatcher`](crate::Dispatcher), which only reads it.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EventTag, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for a tag.
    ///
    /// Registering the same handler twice makes it run twice.
    pub fn register<H>(&mut self, tag: EventTag, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.register_arc(tag, Arc::new(handler));
    }

    /// Append a shared handler for a tag
    pub fn register_arc(&mut self, tag: EventTag, handler: Arc<dyn EventHandler>) {
        debug!(tag = %tag, handler = handler.name(), "Registered event handler");
        self.handlers.entry(tag).or_default().push(handler);
    }

    /// Register everything a source discovers.
    ///
    /// Definitions that fail to load are returned and skipped; the rest are
    /// still registered.
    pub fn load_handlers(&mut self, source: &dyn HandlerSource) -> Vec<HandlerLoadError> {
        let discovery = source.discover();

        for found in discovery.handlers {
            for tag in &found.tags {
                self.register_arc(*tag, found.handler.clone());
            }
        }

        for error in &discovery.errors {
            warn!("{}", error);
        }

        info!(
            source = %source.describe(),
            handlers = self.len(),
            errors = discovery.errors.len(),
            "Loaded event handlers"
        );

        discovery.errors
    }

    /// Handlers for a tag, in registration order
    pub fn handlers_for(&self, tag: EventTag) -> &[Arc<dyn EventHandler>] {
        self.handlers.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get handler count for a tag
    pub fn handler_count(&self, tag: EventTag) -> usize {
        self.handlers_for(tag).len()
    }

    /// Tags with at least one handler
    pub fn tags(&self) -> Vec<EventTag> {
        let mut tags: Vec<_> = self.handlers.keys().copied().collect();
        tags.sort();
        tags
    }

    /// Every registration, grouped by tag
    pub fn iter(&self) -> impl Iterator<Item = (EventTag, &[Arc<dyn EventHandler>])> {
        self.tags()
            .into_iter()
            .map(move |tag| (tag, self.handlers_for(tag)))
    }

    /// Total number of registrations
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (tag, handlers) in self.iter() {
            let names: Vec<_> = handlers.iter().map(|h| h.name()).collect();
            map.entry(&tag, &names);
        }
        map.finish()
    }
}
