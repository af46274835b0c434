//! Workflow execution runtime
//!
//! This crate provides the engine that runs a workflow document: the
//! handler registry, the sequential executor with its pacing hook, and the
//! session object that owns a document between user actions.

mod executor;
mod pacing;
mod registry;
mod session;

pub use executor::{RunResults, WorkflowExecutor};
pub use pacing::{FixedDelay, NoPacing, Pacer};
pub use registry::{ElementMetadata, HandlerRegistry};
pub use session::{RuntimeConfig, WorkflowSession};
