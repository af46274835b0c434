use crate::{pacing::FixedDelay, registry::HandlerRegistry, RunResults, WorkflowExecutor};
use blockcore::{
    BlockError, Config, DocumentError, Element, ElementId, ElementKind, ElementStatus, EventBus,
    ExecutionEvent, WorkflowDocument,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Duration;

/// One user's editing session: the document being built and the results of
/// its last run.
///
/// Created empty, reset by [`clear`](Self::clear), replaced wholesale by
/// [`import`](Self::import). If a host renders from another thread while a
/// run is in progress, it must guard the whole session with one lock.
pub struct WorkflowSession {
    document: WorkflowDocument,
    results: Option<RunResults>,
    registry: Arc<HandlerRegistry>,
    executor: WorkflowExecutor,
    event_bus: Arc<EventBus>,
}

impl WorkflowSession {
    /// Create a new session with default settings
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self::with_config(registry, RuntimeConfig::default())
    }

    pub fn with_config(registry: Arc<HandlerRegistry>, config: RuntimeConfig) -> Self {
        let mut executor = WorkflowExecutor::new();
        if config.step_delay_ms > 0 {
            executor = executor.with_pacer(Arc::new(FixedDelay::from_millis(config.step_delay_ms)));
        }
        if let Some(limit_ms) = config.element_timeout_ms {
            executor = executor.with_element_timeout(Duration::from_millis(limit_ms));
        }

        Self {
            document: WorkflowDocument::new(),
            results: None,
            registry,
            executor,
            event_bus: Arc::new(EventBus::new(config.event_buffer_size)),
        }
    }

    /// Swap in a custom executor (e.g. with a different pacer)
    pub fn with_executor(mut self, executor: WorkflowExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Start from an existing document instead of an empty one
    pub fn with_document(mut self, document: WorkflowDocument) -> Self {
        self.document = document;
        self
    }

    pub fn document(&self) -> &WorkflowDocument {
        &self.document
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Results of the last run, if any run happened since the last clear or import
    pub fn results(&self) -> Option<&RunResults> {
        self.results.as_ref()
    }

    pub fn result_for(&self, id: &ElementId) -> Option<&Value> {
        self.results.as_ref().and_then(|r| r.get(id))
    }

    pub fn add_element(&mut self, kind: ElementKind) -> &Element {
        self.document.add_element(kind)
    }

    pub fn remove_element(&mut self, index: usize) -> Result<Element, DocumentError> {
        self.document.remove_element(index)
    }

    pub fn update_config(&mut self, index: usize, fields: Config) -> Result<ElementStatus, DocumentError> {
        self.document.update_config(index, fields)
    }

    pub fn update_config_by_id(&mut self, id: &ElementId, fields: Config) -> Result<ElementStatus, DocumentError> {
        self.document.update_config_by_id(id, fields)
    }

    /// Run the whole document, replacing any previous results
    pub async fn run(&mut self) -> &RunResults {
        let results = self
            .executor
            .run(&mut self.document, &self.registry, &self.event_bus)
            .await;
        self.results.insert(results)
    }

    /// Empty the document and discard all results
    pub fn clear(&mut self) {
        self.document.clear();
        self.results = None;
    }

    pub fn export(&self) -> Result<Value, BlockError> {
        self.document.serialize()
    }

    pub fn export_json(&self) -> Result<String, BlockError> {
        self.document.to_json_pretty()
    }

    /// Replace the document with an imported one and discard results.
    /// On error the current document is kept. Returns the element count.
    pub fn import(&mut self, value: &Value) -> Result<usize, DocumentError> {
        self.document.deserialize(value)?;
        self.results = None;
        tracing::info!("Workflow imported: {} elements", self.document.len());
        Ok(self.document.len())
    }

    pub fn import_json(&mut self, json: &str) -> Result<usize, BlockError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.import(&value)?)
    }

    /// Subscribe to run events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}

/// Configuration for a session
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Events a slow subscriber may lag behind; zero is treated as one
    pub event_buffer_size: usize,
    /// Artificial pause before each element, for display pacing
    pub step_delay_ms: u64,
    pub element_timeout_ms: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 1000,
            step_delay_ms: 0,
            element_timeout_ms: None,
        }
    }
}
