// crates/blockcore/src/events/mod.rs

mod base;

pub use base::{ElementEvent, EventBus, EventEmitter, ExecutionEvent, RunId};
