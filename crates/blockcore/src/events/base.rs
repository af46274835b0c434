use crate::{ElementId, ElementKind, ElementStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

pub type RunId = Uuid;

/// Events emitted during a workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExecutionEvent {
    RunStarted {
        run_id: RunId,
        element_count: usize,
        timestamp: DateTime<Utc>,
    },
    RunCompleted {
        run_id: RunId,
        ready: usize,
        errors: usize,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    ElementStarted {
        run_id: RunId,
        element_id: ElementId,
        kind: ElementKind,
        index: usize,
        timestamp: DateTime<Utc>,
    },
    /// Handler returned an outcome; `status` may still be `error`
    ElementCompleted {
        run_id: RunId,
        element_id: ElementId,
        status: ElementStatus,
        result: serde_json::Value,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    ElementFailed {
        run_id: RunId,
        element_id: ElementId,
        error: String,
        timestamp: DateTime<Utc>,
    },
    ElementEvent {
        run_id: RunId,
        element_id: ElementId,
        event: ElementEvent,
        timestamp: DateTime<Utc>,
    },
}

/// Messages a handler reports while it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum ElementEvent {
    Info { message: String },
    Warning { message: String },
}

/// Per-element emitter handed to a handler through its context.
/// Every message is tagged with the run and the element it came from.
#[derive(Clone)]
pub struct EventEmitter {
    run_id: RunId,
    element_id: ElementId,
    sender: broadcast::Sender<ExecutionEvent>,
}

impl EventEmitter {
    pub fn new(run_id: RunId, element_id: ElementId, sender: broadcast::Sender<ExecutionEvent>) -> Self {
        Self {
            run_id,
            element_id,
            sender,
        }
    }

    /// Wrap a handler message in [`ExecutionEvent::ElementEvent`] and send it
    pub fn emit(&self, event: ElementEvent) {
        let _ = self.sender.send(ExecutionEvent::ElementEvent {
            run_id: self.run_id,
            element_id: self.element_id.clone(),
            event,
            timestamp: Utc::now(),
        });
    }

    /// Progress note shown next to the running element
    pub fn info(&self, message: impl Into<String>) {
        self.emit(ElementEvent::Info {
            message: message.into(),
        });
    }

    /// Problem worth showing that does not change the element's status
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(ElementEvent::Warning {
            message: message.into(),
        });
    }
}

/// Broadcast bus the UI subscribes to for run progress.
/// Sending with no subscribers is not an error.
pub struct EventBus {
    sender: broadcast::Sender<ExecutionEvent>,
}

impl EventBus {
    /// `capacity` is how many events a slow subscriber may fall behind
    /// before it starts losing the oldest ones. Zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every event sent after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: ExecutionEvent) {
        let _ = self.sender.send(event);
    }

    /// Emitter bound to one element of one run
    pub fn create_emitter(&self, run_id: RunId, element_id: ElementId) -> EventEmitter {
        EventEmitter::new(run_id, element_id, self.sender.clone())
    }
}
