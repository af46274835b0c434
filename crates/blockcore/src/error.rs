use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Element error: {0}")]
    Element(#[from] ElementError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by workflow model operations (edit, import, export)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Index {index} out of range for workflow of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
}

/// Failure while executing a single element.
///
/// The executor converts these into the element's `error` status and an
/// `"Error: <message>"` result; they never escape a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("Missing config: {0}")]
    MissingConfig(String),

    #[error("Invalid config for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("No handler registered for element type: {0}")]
    NoHandler(String),

    #[error("Timeout after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Handler panicked: {0}")]
    Panicked(String),
}
