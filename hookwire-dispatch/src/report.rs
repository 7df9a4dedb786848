//! Dispatch reports

use crate::error::HandlerExecutionError;
use chrono::{DateTime, Utc};
use hookwire_events::{Event, EventTag};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Overall result of dispatching one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Every handler succeeded
    AllSucceeded,

    /// At least one handler failed
    PartialFailure,

    /// Nothing is registered for the event type
    NoHandlers,

    /// Dispatch was cancelled before every handler ran
    Cancelled,
}

impl DispatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllSucceeded => "all_succeeded",
            Self::PartialFailure => "partial_failure",
            Self::NoHandlers => "no_handlers",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a single handler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", content = "error", rename_all = "snake_case")]
pub enum HandlerResult {
    Succeeded,
    Failed(HandlerExecutionError),
    /// Not run because dispatch was aborted or cancelled
    Skipped,
}

/// Outcome of one handler within a dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerOutcome {
    pub handler: String,

    #[serde(flatten)]
    pub result: HandlerResult,

    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl HandlerOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.result, HandlerResult::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.result, HandlerResult::Failed(_))
    }

    pub fn error(&self) -> Option<&HandlerExecutionError> {
        match &self.result {
            HandlerResult::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Per-handler outcomes for one dispatched event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub event_id: Uuid,
    pub tag: EventTag,
    pub started_at: DateTime<Utc>,

    /// Handlers actually invoked (skipped ones excluded)
    pub invoked: usize,

    /// In registration order
    pub outcomes: Vec<HandlerOutcome>,

    pub status: DispatchStatus,
}

impl DispatchReport {
    pub(crate) fn new(event: &Event) -> Self {
        Self {
            event_id: event.id(),
            tag: event.tag(),
            started_at: Utc::now(),
            invoked: 0,
            outcomes: Vec::new(),
            status: DispatchStatus::NoHandlers,
        }
    }

    pub(crate) fn record(&mut self, outcome: HandlerOutcome) {
        if !matches!(outcome.result, HandlerResult::Skipped) {
            self.invoked += 1;
        }
        self.outcomes.push(outcome);
    }

    pub(crate) fn finish(mut self, cancelled: bool) -> Self {
        self.status = if cancelled {
            DispatchStatus::Cancelled
        } else if self.outcomes.is_empty() {
            DispatchStatus::NoHandlers
        } else if self.outcomes.iter().any(HandlerOutcome::is_failure) {
            DispatchStatus::PartialFailure
        } else {
            DispatchStatus::AllSucceeded
        };
        self
    }

    /// Failures in registration order
    pub fn errors(&self) -> impl Iterator<Item = &HandlerExecutionError> {
        self.outcomes.iter().filter_map(HandlerOutcome::error)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.invoked
    }

    pub fn outcome(&self, handler: &str) -> Option<&HandlerOutcome> {
        self.outcomes.iter().find(|o| o.handler == handler)
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
