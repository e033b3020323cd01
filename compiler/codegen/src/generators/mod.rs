//! Generators turning an analyzed model into Go sources.

/// Dispatcher types, one per handler
pub mod dispatcher;
pub use dispatcher::{DispatcherGenerator, HEADER, QUEUE_CAPACITY};
