use crate::{events::EventEmitter, Config, ElementError, ElementId, ElementKind, ElementStatus};
use async_trait::async_trait;
use serde_json::Value;

/// Behaviour behind one or more element kinds
#[async_trait]
pub trait ElementHandler: Send + Sync {
    /// Handler identifier (e.g., "pdf_upload", "input")
    fn name(&self) -> &str;

    /// Compute the result and terminal status for one element
    async fn execute(&self, ctx: ElementContext) -> Result<ElementOutcome, ElementError>;

    /// Optional: describe the handler for palettes and listings
    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata::default()
    }
}

/// Execution context passed to a handler
#[derive(Clone)]
pub struct ElementContext {
    pub element_id: ElementId,

    pub kind: ElementKind,

    /// Snapshot of the element's config at the start of the step
    pub config: Config,

    /// Event emitter for progress messages
    pub events: EventEmitter,
}

impl ElementContext {
    pub fn new(element_id: ElementId, kind: ElementKind, events: EventEmitter) -> Self {
        Self {
            element_id,
            kind,
            config: Config::new(),
            events,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Get config value or return error
    pub fn require_config(&self, name: &str) -> Result<&Value, ElementError> {
        self.config
            .get(name)
            .ok_or_else(|| ElementError::MissingConfig(name.to_string()))
    }

    /// Get config with default
    pub fn get_config_or(&self, name: &str, default: Value) -> Value {
        self.config.get(name).cloned().unwrap_or(default)
    }
}

/// What one step produced: the `(status, result)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct ElementOutcome {
    pub status: ElementStatus,
    pub result: Value,
}

impl ElementOutcome {
    pub fn ready(result: impl Into<Value>) -> Self {
        Self {
            status: ElementStatus::Ready,
            result: result.into(),
        }
    }

    pub fn error(result: impl Into<Value>) -> Self {
        Self {
            status: ElementStatus::Error,
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandlerMetadata {
    pub description: String,
    pub category: String,
}

impl Default for HandlerMetadata {
    fn default() -> Self {
        Self {
            description: String::new(),
            category: "general".to_string(),
        }
    }
}
