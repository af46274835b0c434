use crate::pacing::{NoPacing, Pacer};
use crate::registry::HandlerRegistry;
use blockcore::{
    Element, ElementContext, ElementError, ElementId, ElementOutcome, ElementStatus, EventBus,
    ExecutionEvent, RunId, WorkflowDocument,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;
use tokio::time::{timeout, Duration};

/// Runs a workflow document one element at a time, in document order
pub struct WorkflowExecutor {
    pacer: Arc<dyn Pacer>,
    element_timeout: Option<Duration>,
}

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self {
            pacer: Arc::new(NoPacing),
            element_timeout: None,
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Fail any single element whose handler takes longer than `limit`
    pub fn with_element_timeout(mut self, limit: Duration) -> Self {
        self.element_timeout = Some(limit);
        self
    }

    /// Execute every element and return a result per element id.
    ///
    /// Each element goes `processing` then `ready` or `error`; element
    /// *i + 1* starts only after element *i* is terminal. A failing element
    /// never stops the run.
    pub async fn run(
        &self,
        document: &mut WorkflowDocument,
        registry: &HandlerRegistry,
        event_bus: &EventBus,
    ) -> RunResults {
        let run_id = RunId::new_v4();
        let start_time = Instant::now();

        if document.is_empty() {
            tracing::warn!("No workflow elements to execute");
        }

        event_bus.emit(ExecutionEvent::RunStarted {
            run_id,
            element_count: document.len(),
            timestamp: Utc::now(),
        });

        tracing::info!("Starting run {} over {} elements", run_id, document.len());

        let mut results = HashMap::with_capacity(document.len());
        let mut ready = 0;
        let mut errors = 0;

        for (index, element) in document.elements_mut().iter_mut().enumerate() {
            element.mark_processing();

            event_bus.emit(ExecutionEvent::ElementStarted {
                run_id,
                element_id: element.id().clone(),
                kind: element.kind().clone(),
                index,
                timestamp: Utc::now(),
            });

            self.pacer.pace(element).await;

            let step_start = Instant::now();
            let outcome = self.execute_element(run_id, element, registry, event_bus).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            let (status, result) = match outcome {
                Ok(ElementOutcome { status, result }) => {
                    tracing::debug!("Element {} finished {} in {}ms", element.id(), status, duration_ms);

                    event_bus.emit(ExecutionEvent::ElementCompleted {
                        run_id,
                        element_id: element.id().clone(),
                        status,
                        result: result.clone(),
                        duration_ms,
                        timestamp: Utc::now(),
                    });

                    (status, result)
                }
                Err(e) => {
                    tracing::error!("Element {} failed: {}", element.id(), e);

                    event_bus.emit(ExecutionEvent::ElementFailed {
                        run_id,
                        element_id: element.id().clone(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });

                    (ElementStatus::Error, Value::String(format!("Error: {}", e)))
                }
            };

            match status {
                ElementStatus::Ready => ready += 1,
                _ => errors += 1,
            }

            element.record_outcome(status, result.clone());
            results.insert(element.id().clone(), result);
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;

        event_bus.emit(ExecutionEvent::RunCompleted {
            run_id,
            ready,
            errors,
            duration_ms,
            timestamp: Utc::now(),
        });

        tracing::info!(
            "Run {} completed in {}ms: {} ready, {} errors",
            run_id,
            duration_ms,
            ready,
            errors
        );

        RunResults {
            run_id,
            results,
            ready,
            errors,
            duration_ms,
        }
    }

    /// Run one handler in its own task so a panic stays local to the element
    async fn execute_element(
        &self,
        run_id: RunId,
        element: &Element,
        registry: &HandlerRegistry,
        event_bus: &EventBus,
    ) -> Result<ElementOutcome, ElementError> {
        let handler = registry
            .resolve(element.kind())
            .ok_or_else(|| ElementError::NoHandler(element.kind().to_string()))?;

        let ctx = ElementContext::new(
            element.id().clone(),
            element.kind().clone(),
            event_bus.create_emitter(run_id, element.id().clone()),
        )
        .with_config(element.config().clone());

        let mut task = tokio::spawn(async move { handler.execute(ctx).await });

        let joined = match self.element_timeout {
            Some(limit) => match timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    return Err(ElementError::Timeout {
                        millis: limit.as_millis() as u64,
                    });
                }
            },
            None => task.await,
        };

        let outcome = joined.map_err(join_error)??;

        if !outcome.status.is_terminal() {
            return Err(ElementError::ExecutionFailed(format!(
                "handler returned non-terminal status {}",
                outcome.status
            )));
        }

        Ok(outcome)
    }
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn join_error(e: JoinError) -> ElementError {
    if e.is_panic() {
        ElementError::Panicked(panic_message(e.into_panic()))
    } else {
        ElementError::ExecutionFailed(format!("Task join error: {}", e))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Results of one run, keyed by element id.
///
/// Rebuilt from scratch on every run; never merged with earlier runs.
#[derive(Debug, Clone, Serialize)]
pub struct RunResults {
    pub run_id: RunId,
    pub results: HashMap<ElementId, Value>,
    pub ready: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl RunResults {
    pub fn get(&self, id: &ElementId) -> Option<&Value> {
        self.results.get(id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// No element ended in `error`
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}
