//! Core abstractions for blockflow
//!
//! This crate provides the workflow model every other component depends on:
//! typed elements with their readiness rules and form schemas, the workflow
//! document with its JSON export format, execution events and the handler
//! contract the runtime drives. It has no runtime dependencies.

mod document;
mod element;
mod error;
pub mod events;
mod handler;
mod schema;
mod value;

pub use document::{export_file_name, DocumentStats, WorkflowDocument, FORMAT_VERSION};
pub use element::{Element, ElementId, ElementKind, ElementStatus, Position};
pub use error::{BlockError, DocumentError, ElementError};
pub use events::*;
pub use handler::{ElementContext, ElementHandler, ElementOutcome, HandlerMetadata};
pub use schema::{parse_options, FieldDefinition};
pub use value::{display_value, is_truthy, Config, ConfigExt};

/// Result type for blockflow operations
pub type Result<T> = std::result::Result<T, BlockError>;
